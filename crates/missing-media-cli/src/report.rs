use colored::*;
use missing_media_core::{NormalizedPath, Report, Section};
use tracing::info;

pub fn print_report(report: &Report) {
    let section = &report.section;
    let result = &report.reconciliation;

    info!(
        "Disk: {}, Library: {}",
        format!("{:.2}s", report.walk_duration.as_secs_f64()).green(),
        format!("{:.2}s", report.library_duration.as_secs_f64()).green(),
    );

    println!();
    println!(
        "Library section {} (\"{}\"): {} files on disk, {} items in library",
        section.key,
        section.title,
        format!("{}", report.files_on_disk).cyan(),
        format!("{}", report.files_in_library).cyan(),
    );
    if report.ignored_in_library > 0 {
        println!(
            "{} library items matched ignore patterns and were skipped",
            report.ignored_in_library
        );
    }

    print_paths(
        "on disk but not in Plex library",
        &result.missing_from_library,
    );
    print_paths("in library but not on disk", &result.missing_from_disk);

    if result.is_clean() {
        println!("{}", "Disk and library match.".green());
    }
}

fn print_paths(what: &str, paths: &[NormalizedPath]) {
    let count = if paths.is_empty() {
        format!("{}", paths.len()).green()
    } else {
        format!("{}", paths.len()).red()
    };
    println!("Found {} items {}:", count, what);
    for path in paths {
        println!("\t{}", path);
    }
}

pub fn print_sections(sections: &[Section]) {
    println!("\nAvailable Libraries:\n");
    for section in sections {
        println!(
            "[{}] {} ({})",
            section.key,
            section.title,
            section.kind.to_string().dimmed()
        );
        for location in &section.locations {
            println!("\t{}", location);
        }
    }
}
