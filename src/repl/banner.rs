use console::{style, Term};

const BRAND: u8 = 38; // deep sky blue
const BRAND_DIM: u8 = 24;
const DIM: u8 = 240;

const SEP_CHAR: char = '\u{2026}';

const TAGLINE: &str = "AI shipment analytics from your spreadsheets";

const LOGO: &[&str] = &[
    "     _     _       _                ",
    " ___| |__ (_)_ __ | | ___ _ __  ___ ",
    "/ __| '_ \\| | '_ \\| |/ _ \\ '_ \\/ __|",
    "\\__ \\ | | | | |_) | |  __/ | | \\__ \\",
    "|___/_| |_|_| .__/|_|\\___|_| |_|___/",
    "            |_|                     ",
];

/// What the banner reports about the session that is starting.
pub struct BannerInfo<'a> {
    pub provider: &'a str,
    pub primary_model: &'a str,
    pub fallback_model: &'a str,
    pub store_path: &'a str,
    /// Title of a report restored from the snapshot store.
    pub restored_title: Option<&'a str>,
}

pub fn show_banner(info: &BannerInfo<'_>) {
    let term = Term::stdout();
    let (_, term_cols) = term.size();
    let term_w = term_cols as usize;

    let center = |text_w: usize| -> String {
        if term_w > text_w + 4 {
            " ".repeat((term_w - text_w) / 2)
        } else {
            "  ".to_string()
        }
    };

    println!();
    for line in LOGO {
        println!("{}{}", center(line.len()), style(line).color256(BRAND).bold());
    }

    let version_str = format!(
        "v{} ({})",
        env!("CARGO_PKG_VERSION"),
        option_env!("GIT_HASH").unwrap_or("dev")
    );
    println!("{}{}", center(version_str.len()), style(&version_str).color256(DIM));

    let scene_w = term_w.clamp(40, 76);
    let pad = center(scene_w);
    let sep = SEP_CHAR.to_string().repeat(scene_w);
    println!("{}{}", pad, style(&sep).color256(BRAND_DIM));
    println!("{}{}", center(TAGLINE.len()), style(TAGLINE).white().bold());
    println!("{}{}", pad, style(&sep).color256(BRAND_DIM));
    println!();

    let mut lines = vec![
        format!("Provider   {}", info.provider),
        format!("Models     {} (fallback {})", info.primary_model, info.fallback_model),
        format!("Snapshot   {}", info.store_path),
    ];
    if let Some(title) = info.restored_title {
        lines.push(format!("Restored   {}", title));
    }
    print_box(&lines, &center);
    println!();

    let guide: &[(&str, &str)] = &[
        ("/load <file> [instructions]", "Analyze a CSV or Excel file"),
        ("<any text>", "Refine the current report"),
        ("/export html report.html", "Save a printable report"),
        ("/help", "List all commands"),
    ];
    let p = center(60);
    println!("{}  {}", p, style("Quick Start:").white().bold());
    for (cmd, desc) in guide {
        println!("{}    {:<30} {}", p, style(cmd).color256(BRAND), style(desc).dim());
    }
    println!();
}

fn print_box(lines: &[String], center: &dyn Fn(usize) -> String) {
    let content_w = lines.iter().map(|l| l.chars().count()).max().unwrap_or(40);
    let inner_w = content_w + 4;
    let pad = center(inner_w + 2);
    let hbar = "\u{2500}".repeat(inner_w);

    println!(
        "{}{}{}{}",
        pad,
        style("\u{250c}").color256(BRAND_DIM),
        style(&hbar).color256(BRAND_DIM),
        style("\u{2510}").color256(BRAND_DIM),
    );
    for line in lines {
        let right_pad = inner_w.saturating_sub(line.chars().count() + 2);
        println!(
            "{}{}  {}{}{}",
            pad,
            style("\u{2502}").color256(BRAND_DIM),
            style(line).dim(),
            " ".repeat(right_pad),
            style("\u{2502}").color256(BRAND_DIM),
        );
    }
    println!(
        "{}{}{}{}",
        pad,
        style("\u{2514}").color256(BRAND_DIM),
        style(&hbar).color256(BRAND_DIM),
        style("\u{2518}").color256(BRAND_DIM),
    );
}
