//! Terminal output for pipeline progress.

use console::style;

use crate::bump::FileChange;
use crate::process::Invocation;

pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Announce an external tool call before it runs
pub fn display_invocation(invocation: &Invocation) {
    println!("{} {}", style("$").cyan(), style(invocation).bold());
}

/// Show the release that is about to happen
pub fn display_release(version: &str, dist_tag: &str) {
    println!(
        "\n{} {} {} {}",
        style("Releasing").bold(),
        style(version).green(),
        style("under dist-tag").bold(),
        style(dist_tag).green()
    );
}

/// Show what a dry run would have done
///
/// # Arguments
/// * `changes` - Files the version bump would rewrite
/// * `steps` - Tool invocations in execution order
pub fn display_plan(changes: &[FileChange], steps: &[Invocation]) {
    println!("\n{}", style("Dry run, nothing will be executed:").bold());
    for change in changes {
        println!(
            "  bump  {}: {} -> {} ({}x)",
            change.path.display(),
            change.search,
            change.replace,
            change.occurrences
        );
    }
    for step in steps {
        println!("  run   {}", step);
    }
}
