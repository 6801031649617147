use super::FrozenReport;
use crate::license::DocumentKind;

const RULE: &str = "*****************************************************";

/// Line-oriented summary: totals, family table, then unapproved files
/// sorted by path.
pub fn render(report: &FrozenReport) -> String {
    let stats = report.statistics();
    let kind_count = |kind| stats.kind_counts.get(&kind).copied().unwrap_or(0);
    let mut output = String::new();

    output.push_str(RULE);
    output.push('\n');
    output.push_str("Summary\n-------\n");
    output.push_str(&format!("Notes: {}\n", kind_count(DocumentKind::Notice)));
    output.push_str(&format!("Binaries: {}\n", kind_count(DocumentKind::Binary)));
    output.push_str(&format!("Archives: {}\n", kind_count(DocumentKind::Archive)));
    output.push_str(&format!("Standards: {}\n\n", kind_count(DocumentKind::Standard)));

    output.push_str(&format!("Apache Licensed: {}\n", stats.count_for("AL")));
    output.push_str(&format!("Generated Documents: {}\n\n", stats.count_for("GEN")));

    output.push_str(&format!("{} Total files\n", stats.num_total));
    output.push_str(&format!("{} Approved\n", stats.num_approved));
    output.push_str(&format!("{} Unapproved\n", stats.num_unapproved));
    output.push_str(&format!("{} Unknown licenses\n", stats.num_unknown));
    output.push_str(&format!("{} Unreadable files\n\n", stats.num_read_errors));

    if !stats.family_counts.is_empty() {
        output.push_str("License families:\n");
        output.push_str(&format_family_table(report));
        output.push('\n');
    }

    output.push_str(RULE);
    output.push('\n');

    let unapproved = report.unapproved();
    if unapproved.is_empty() {
        output.push_str("All files have approved licenses.\n");
    } else {
        output.push_str("Files with unapproved licenses:\n\n");
        for claim in unapproved {
            output.push_str(&format!("  {} — {}\n", claim.path, claim.reason()));
        }
    }
    output.push_str(RULE);
    output.push('\n');

    output
}

fn format_family_table(report: &FrozenReport) -> String {
    let mut output = String::new();

    output.push_str("┌───────┬──────────────────────────────┬───────┐\n");
    output.push_str("│ Code  │ Family                       │ Files │\n");
    output.push_str("├───────┼──────────────────────────────┼───────┤\n");

    for (family, count) in &report.statistics().family_counts {
        output.push_str(&format!(
            "│ {:<5} │ {:<28} │ {:>5} │\n",
            truncate(&family.category, 5),
            truncate(&family.name, 28),
            count
        ));
    }

    output.push_str("└───────┴──────────────────────────────┴───────┘\n");
    output
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len - 1).collect();
        format!("{}…", kept)
    }
}
