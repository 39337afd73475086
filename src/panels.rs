//! Static copy for the side panels and the plain-text report.

use std::fmt::Write;

use crate::catalog::DETERMINANTS;
use crate::explorer::Explorer;
use crate::params::AdoptionParams;

pub const TITLE: &str = "The Diffusion of Innovation";

pub const INTRO: &str = "Explore how innovations spread through populations following Rogers' \
universal S-curve pattern. Adjust the parameters to see how adoption speed and market saturation \
affect the timeline.";

pub const PARAMETER_HEADING: &str = "Adoption Parameters";
pub const SPEED_LABEL: &str = "Adoption Speed";
pub const SPEED_HELP: &str = "How quickly the innovation moves through adoption phases";
pub const SATURATION_LABEL: &str = "Market Saturation";
pub const SATURATION_HELP: &str = "Maximum market penetration the innovation will achieve";

pub const DETERMINANT_HEADING: &str = "Rogers' Five Determinants";
pub const DETERMINANT_SUBHEADING: &str =
    "These attributes predict adoption velocity across all contexts";

pub const KEY_INSIGHT: &str = "Key insight: While the S-curve pattern is universal, these \
determinants control the speed and scale of adoption in each specific context.";

pub const CONTEXT_HEADING: &str = "From Universal to Contextual";
pub const CONTEXT_BODY: &str = "In oncology, this elegant curve encounters regulatory gatekeepers, \
economic constraints, operational barriers, and complex human psychology. The universal pattern \
remains, but the determinants become domain-specific: clinical evidence strength, payer coverage \
decisions, institutional protocols, physician familiarity, and patient access dynamics all reshape \
how, and how quickly, a therapy moves from approval to routine care.";

/// Scenario sentence under the sliders
pub fn scenario_line(params: &AdoptionParams) -> String {
    format!(
        "Current scenario: Reaches {}% adoption in approximately {} months",
        params.saturation(),
        params.approximate_months_to_saturation()
    )
}

/// Greedy word wrap at `width` characters. Words longer than a line stay whole.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Everything the window shows, as plain text
pub fn text_report(explorer: &Explorer) -> String {
    let view = explorer.view();
    let params = explorer.params();
    let mut out = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(out, "{}", TITLE);
    let _ = writeln!(out, "{}", "=".repeat(TITLE.len()));
    for line in wrap(INTRO, 78) {
        let _ = writeln!(out, "{}", line);
    }

    let _ = writeln!(out, "\n{}", PARAMETER_HEADING);
    let _ = writeln!(
        out,
        "  {:<18} {:>3}  ({})",
        SPEED_LABEL,
        params.speed(),
        params.speed_label()
    );
    let _ = writeln!(out, "  {:<18} {:>3}%", SATURATION_LABEL, params.saturation());
    let _ = writeln!(out, "  {}", scenario_line(params));
    let _ = writeln!(
        out,
        "  Progress: {}% ({})",
        view.progress_percent(),
        view.control_label.as_str()
    );

    let _ = writeln!(out, "\nAdopter segments");
    for boundary in &view.boundaries {
        let segment = boundary.segment;
        let _ = writeln!(
            out,
            "  {:<15} {:>5}%  months {:>3}..{:<3}  share {:>5.1}..{:<5.1}  {}",
            segment.name,
            segment.percent,
            boundary.start_month,
            boundary.end_month,
            boundary.start_percent,
            boundary.end_percent,
            segment.description
        );
    }

    if let Some(end) = view.endpoint() {
        let _ = writeln!(
            out,
            "\nCurve endpoint: month {} at {:.1}% adoption",
            end.month, end.adoption
        );
    }

    let _ = writeln!(out, "\n{}", DETERMINANT_HEADING);
    let _ = writeln!(out, "  {}", DETERMINANT_SUBHEADING);
    for determinant in &DETERMINANTS {
        let _ = writeln!(
            out,
            "  [{}] {:<19} ({}) {}",
            determinant.impact.symbol(),
            determinant.name,
            determinant.value,
            determinant.description
        );
    }
    for line in wrap(KEY_INSIGHT, 76) {
        let _ = writeln!(out, "  {}", line);
    }

    let _ = writeln!(out, "\n{}", CONTEXT_HEADING);
    for line in wrap(CONTEXT_BODY, 78) {
        let _ = writeln!(out, "{}", line);
    }

    out
}

/// Window title mirroring the live labels the GPU pass cannot draw
pub fn window_title(explorer: &Explorer) -> String {
    let params = explorer.params();
    let driver = explorer.driver();
    let mut title = format!(
        "{} | {} {}% | {} {} ({}) | {} {}%",
        TITLE,
        driver.control_label().as_str(),
        driver.progress_percent(),
        SPEED_LABEL,
        params.speed(),
        params.speed_label(),
        SATURATION_LABEL,
        params.saturation()
    );
    if let Some(segment) = explorer.hovered_segment() {
        let _ = write!(title, " | {} {}%", segment.name, segment.percent);
    }
    title
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_respects_width() {
        let lines = wrap("Risk-takers who embrace new ideas first", 24);
        assert_eq!(lines, ["Risk-takers who embrace", "new ideas first"]);
        assert!(wrap(KEY_INSIGHT, 58).iter().all(|l| l.len() <= 58));
        assert!(wrap("   ", 10).is_empty());
        assert_eq!(wrap("supercalifragilistic", 5), ["supercalifragilistic"]);
    }

    #[test]
    fn test_scenario_line() {
        let params = AdoptionParams::new(100.0, 60.0);
        assert_eq!(
            scenario_line(&params),
            "Current scenario: Reaches 60% adoption in approximately 60 months"
        );
    }

    #[test]
    fn test_text_report_lists_everything() {
        let mut explorer = Explorer::default();
        explorer.seek(100.0);
        let report = text_report(&explorer);

        assert!(report.starts_with(TITLE));
        assert!(report.contains("Progress: 100% (Replay)"));
        let names = [
            "Innovators",
            "Early Adopters",
            "Early Majority",
            "Late Majority",
            "Laggards",
        ];
        for name in names {
            assert!(report.contains(name), "missing segment {}", name);
        }
        for determinant in &DETERMINANTS {
            assert!(report.contains(determinant.name));
        }
        assert!(report.contains("Curve endpoint: month 120"));
        assert!(report.contains(CONTEXT_HEADING));
    }

    #[test]
    fn test_window_title_tracks_state() {
        let mut explorer = Explorer::default();
        assert_eq!(
            window_title(&explorer),
            "The Diffusion of Innovation | Play 0% | Adoption Speed 50 (Moderate) \
             | Market Saturation 85%"
        );

        explorer.seek(42.5);
        explorer.hover(Some(1));
        let title = window_title(&explorer);
        assert!(title.contains("Play 43%"));
        assert!(title.ends_with(" | Early Adopters 13.5%"));
    }
}
