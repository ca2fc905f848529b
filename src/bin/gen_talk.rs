//! Talk view fixture generator for stress testing talkpack.
//!
//! Writes a saved-page capture of a LINE WORKS talk view with stamped
//! geometry, mixing every item shape the extractor has to handle.
//!
//! Usage: cargo run --features gen-test --bin gen_talk -- [messages] [output] [seed]
//! Example: cargo run --features gen-test --bin gen_talk -- 50000 heavy_talk.html

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::env;
use std::fs::File;
use std::io::{self, BufWriter, Write};

const VIEWPORT_WIDTH: u32 = 1280;
const VIEWPORT_HEIGHT: u32 = 900;

const SPEAKERS: &[&str] = &[
    "Alex Kim",
    "佐藤 花子",
    "Иван",
    "Kim <Ops>",
    "R&D Bot",
    "🔥FireUser🔥",
];

const TEXTS: &[&str] = &[
    "On my way",
    "Sounds good, see you at 3",
    "Line one\nLine two\nLine three",
    "Tabs\tand   spaces   stay",
    "<script>alert(1)</script>",
    "Quotes \"double\" and 'single'",
    "こんにちは、よろしくお願いします",
    "Кириллица: Привет мир!",
    "Mixed: Hello Привет 你好 🌍",
    "09:00",
];

const FILES: &[&str] = &["report.pdf", "minutes 2024-01.docx", "画像.png", "a&b.zip"];

const NOTICES: &[&str] = &[
    "Kim joined.",
    "Alex left.",
    "Alex changed the room name to \"Launch\".",
];

const WEEKDAYS: &[&str] = &["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

fn main() -> io::Result<()> {
    let args: Vec<String> = env::args().collect();

    let count: usize = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(10_000);
    let output = args.get(2).map(|s| s.as_str()).unwrap_or("heavy_talk.html");
    let seed: u64 = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(42);

    println!("🧪 Talk Generator");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("   Messages: {}", count);
    println!("   Output:   {}", output);
    println!("   Seed:     {}", seed);
    println!();

    let file = File::create(output)?;
    let mut writer = BufWriter::with_capacity(1024 * 1024, file);
    let mut rng = StdRng::seed_from_u64(seed);

    let start = std::time::Instant::now();
    let bytes_written = generate(&mut writer, &mut rng, count)?;
    writer.flush()?;

    let elapsed = start.elapsed();
    println!("\n\n✅ Done!");
    println!("   Size: {:.2} MB", bytes_written as f64 / 1_000_000.0);
    println!("   Time: {:.2}s", elapsed.as_secs_f64());
    println!(
        "   Speed: {:.0} msg/s",
        count as f64 / elapsed.as_secs_f64()
    );
    Ok(())
}

fn generate(writer: &mut impl Write, rng: &mut impl Rng, count: usize) -> io::Result<usize> {
    let mut bytes = 0;

    put(
        writer,
        &mut bytes,
        &format!(
            "<!DOCTYPE html>\n<html data-viewport-width=\"{}\" data-viewport-height=\"{}\">\n\
             <head><title>LINE WORKS</title></head>\n<body>\n",
            VIEWPORT_WIDTH, VIEWPORT_HEIGHT
        ),
    )?;
    put(
        writer,
        &mut bytes,
        "<div class=\"section_head\"><div class=\"info_box\"><strong class=\"name\">Alex Kim</strong></div></div>\n",
    )?;
    // Conversation list, narrow and full of message-looking rows
    put(writer, &mut bytes, "<ul class=\"talk_list\" data-rect=\"0,60,240,840\">\n")?;
    for speaker in SPEAKERS {
        put(
            writer,
            &mut bytes,
            &format!(
                "  <li class=\"msg_wrap\"><span class=\"name\">{}</span></li>\n",
                escape_html(speaker)
            ),
        )?;
    }
    put(writer, &mut bytes, "</ul>\n")?;
    put(writer, &mut bytes, "<ul class=\"chat_view\" data-rect=\"260,60,1000,840\">\n")?;

    let mut day = 0;
    let mut top: u32 = 60;
    let mut last_other: Option<&str> = None;

    for i in 0..count {
        if i % 200 == 0 {
            day += 1;
            let label = format!("2024. 1. {} ({})", day, WEEKDAYS[(day - 1) % WEEKDAYS.len()]);
            put(
                writer,
                &mut bytes,
                &format!("  <li class=\"inform_date\"><span class=\"date\">{}</span></li>\n", label),
            )?;
            last_other = None;
        }
        if i % 97 == 50 {
            let notice = NOTICES.choose(rng).copied().unwrap_or("Kim joined.");
            put(writer, &mut bytes, &format!("  <li class=\"inform_msg\">{}</li>\n", escape_html(notice)))?;
        }
        if i % 131 == 7 {
            put(writer, &mut bytes, "  <li class=\"msg_lft\" style=\"display:none\"><p class=\"msg\">deleted</p></li>\n")?;
        }

        let time = format!("{:02}:{:02}", 8 + (i / 60) % 12, i % 60);
        let item = if rng.gen_bool(0.4) {
            last_other = None;
            self_item(rng, i, &time, top)
        } else {
            let speaker = SPEAKERS.choose(rng).copied().unwrap_or("Alex Kim");
            let continued = last_other == Some(speaker) && rng.gen_bool(0.7);
            last_other = Some(speaker);
            other_item(rng, i, speaker, continued, &time, top)
        };
        put(writer, &mut bytes, &item)?;
        top += 48;

        if (i + 1) % 10_000 == 0 {
            eprint!("\r   Generated {}/{}", i + 1, count);
        }
    }

    put(writer, &mut bytes, "</ul>\n</body>\n</html>\n")?;
    Ok(bytes)
}

fn put(writer: &mut impl Write, bytes: &mut usize, s: &str) -> io::Result<()> {
    *bytes += s.len();
    writer.write_all(s.as_bytes())
}

fn self_item(rng: &mut impl Rng, index: usize, time: &str, top: u32) -> String {
    let content = content(rng, index);
    if index % 11 == 0 {
        // Metadata-only self flag, no class marker
        let millis = 1_704_067_200_000_i64 + index as i64 * 60_000;
        let record = format!(
            "{{&quot;messageTime&quot;:{},&quot;isMine&quot;:true}}",
            millis
        );
        return format!(
            "  <li class=\"msg_wrap\" data-for-copy=\"{}\"><div class=\"msg_box\" data-rect=\"900,{},300,40\">{}</div></li>\n",
            record, top, content
        );
    }
    format!(
        "  <li class=\"msg_rgt\"><div class=\"msg_box\" data-rect=\"900,{},300,40\">{}<span class=\"date\">{}</span></div></li>\n",
        top, content, time
    )
}

fn other_item(
    rng: &mut impl Rng,
    index: usize,
    speaker: &str,
    continued: bool,
    time: &str,
    top: u32,
) -> String {
    let header = if continued {
        String::new()
    } else {
        format!("<dt><span class=\"name\">{}</span></dt>", escape_html(speaker))
    };
    let mut content = content(rng, index);
    if index % 13 == 0 {
        let quoted = SPEAKERS.choose(rng).copied().unwrap_or("Alex Kim");
        content = format!(
            "<div class=\"reply_box\"><span class=\"name\">{}</span><span class=\"date\">07:00</span>\
             <i class=\"ico_my\"></i><p>earlier message</p></div>{}",
            escape_html(quoted),
            content
        );
    }
    format!(
        "  <li class=\"msg_lft\"><dl>{}<dd><div class=\"msg_box\" data-rect=\"300,{},420,40\">{}<span class=\"date\">{}</span></div></dd></dl></li>\n",
        header, top, content, time
    )
}

fn content(rng: &mut impl Rng, index: usize) -> String {
    match index % 25 {
        0 => "<div class=\"sticker_box\"><img src=\"sticker.png\"></div>".to_string(),
        1 => {
            let name = FILES.choose(rng).copied().unwrap_or("report.pdf");
            format!(
                "<div class=\"file_box\"><span class=\"file_name\">{}</span></div>",
                escape_html(name)
            )
        }
        2 => "<div class=\"thmb\"><img src=\"photo.jpg\"></div>".to_string(),
        3 => {
            // Link preview whose description must not leak into the body
            let text = TEXTS.choose(rng).copied().unwrap_or("On my way");
            format!(
                "<p class=\"msg\">{}<span class=\"desc\">preview text</span></p>",
                escape_html(text)
            )
        }
        4 => {
            let padding: String = (0..5_000).map(|_| 'X').collect();
            format!("<p class=\"msg\">Giant message #{}: {}</p>", index, padding)
        }
        _ => {
            let text = TEXTS.choose(rng).copied().unwrap_or("On my way");
            format!(
                "<p class=\"msg\">{}</p>",
                escape_html(text).replace('\n', "<br>")
            )
        }
    }
}

fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            c => result.push(c),
        }
    }
    result
}
