use crate::ui::{theme, Icons};
use owo_colors::OwoColorize;

pub fn header(icon: &str, text: &str) {
    println!("{} {}", icon, text.style(theme().header.clone()));
}

pub fn success(label: &str) {
    println!("{} {}", Icons::CHECK, label.style(theme().success.clone()));
}

pub fn error(label: &str) {
    eprintln!("{} {}", Icons::CROSS, label.style(theme().error.clone()));
}

pub fn warn(label: &str) {
    eprintln!("{} {}", Icons::WARN, label.style(theme().warn.clone()));
}

pub fn info(label: &str, value: &str) {
    println!(
        "{} {}: {}",
        Icons::INFO.style(theme().info.clone()),
        label.style(theme().dim.clone()),
        value
    );
}

pub fn section(title: &str) {
    println!();
    println!("━{}━", title.style(theme().header.clone()));
}

pub fn dim(text: &str) -> String {
    text.style(theme().dim.clone()).to_string()
}

pub fn summary_row(label: &str, value: &str) {
    println!("  {} {}", label.style(theme().dim.clone()), value);
}

/// `Saved student #3`
pub fn saved(kind: &str, id: i64) {
    success(&format!("Saved {} {}", kind, format!("#{id}").style(theme().id.clone())));
}

/// `No teacher with id 7`
pub fn not_found(kind: &str, id: i64) {
    warn(&format!("No {kind} with id {id}"));
}

pub fn linked(owner: &str, owner_id: i64, related: &str, related_id: i64) {
    println!(
        "{} {} #{} {} {} #{}",
        Icons::LINK.style(theme().info.clone()),
        owner,
        owner_id,
        "→".style(theme().dim.clone()),
        related,
        related_id
    );
}

pub fn unlinked(owner: &str, owner_id: i64, related: &str, related_id: i64) {
    println!(
        "{} {} #{} {} {} #{}",
        Icons::UNLINK.style(theme().warn.clone()),
        owner,
        owner_id,
        "✕".style(theme().dim.clone()),
        related,
        related_id
    );
}
