//! Terminal rendering of result views
//!
//! Every view renders from the canonical records produced by the
//! presentation model; nothing in here reaches back into raw payloads.

use colored::Colorize;

use promptbench::matrix::HistoryMatrix;
use promptbench::presentation::{BundleView, InputView, ResultView};
use promptbench::report::GridRow;
use promptbench::timeline::TimelineDay;

/// Truncate string safely for UTF-8 (by char count, not bytes)
pub fn truncate_string(s: &str, max_chars: usize) -> String {
    let chars: Vec<char> = s.chars().take(max_chars).collect();
    if s.chars().count() > max_chars {
        format!("{}...", chars.into_iter().collect::<String>())
    } else {
        s.to_string()
    }
}

fn quality_colored(quality: &str) -> colored::ColoredString {
    match quality {
        "good" => quality.green(),
        "ok" => quality.yellow(),
        "bad" => quality.red(),
        other => other.normal(),
    }
}

fn one_line(s: &str) -> String {
    s.replace('\n', " ")
}

/// One result unit: header line, output text, evaluation line
pub fn print_result(result: &ResultView, indent: &str) {
    println!(
        "{}{} {} {} {}",
        indent,
        result.model_name.cyan().bold(),
        result.prompt_label.magenta(),
        format!("{}s", result.processing_time).dimmed(),
        result
            .created_at
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
            .dimmed()
    );
    for line in result.output_text.lines() {
        println!("{}  {}", indent, line);
    }
    match &result.evaluation {
        Some(mark) => {
            let notes = mark
                .notes
                .as_deref()
                .filter(|n| !n.is_empty())
                .map(|n| format!(" - {}", truncate_string(n, 60)))
                .unwrap_or_default();
            println!(
                "{}  {} {}{}",
                indent,
                "evaluated:".dimmed(),
                quality_colored(&mark.quality.to_string()),
                notes.dimmed()
            );
        }
        None => {
            let hint = match result.output_id {
                Some(id) => format!("promptbench evaluate {} <bad|ok|good>", id),
                None => "not evaluable (no output id)".to_string(),
            };
            println!("{}  {} {}", indent, "not evaluated".dimmed(), hint.dimmed());
        }
    }
}

fn print_input_header(input: &InputView) {
    println!("{}", input.name.bold());
    println!("  {}", truncate_string(&one_line(&input.text), 100).dimmed());
}

/// Single-run view: the input followed by every result
pub fn print_bundle(bundle: &BundleView) {
    print_input_header(&bundle.input);
    if bundle.results.is_empty() {
        println!("  {}", "No results available for this input".dimmed());
        return;
    }
    for result in &bundle.results {
        println!();
        print_result(result, "  ");
    }
}

/// Batch grid: one block per visible row
pub fn print_grid(rows: &[GridRow]) {
    let visible: Vec<&GridRow> = rows.iter().filter(|r| r.visible).collect();
    if visible.is_empty() {
        println!("{}", "No results to display".dimmed());
        return;
    }
    for (index, row) in visible.iter().enumerate() {
        if index > 0 {
            println!();
        }
        print_input_header(&row.input);
        if row.results.is_empty() {
            println!("  {}", "No results available for this input".dimmed());
            continue;
        }
        for result in &row.results {
            println!();
            print_result(result, "  ");
        }
    }
    let hidden = rows.len() - visible.len();
    if hidden > 0 {
        println!();
        println!("{}", format!("({} rows hidden by filter)", hidden).dimmed());
    }
}

/// Side-by-side comparison: results grouped by prompt within each input
pub fn print_comparison(bundle: &BundleView) {
    print_input_header(&bundle.input);
    if bundle.results.is_empty() {
        println!("  {}", "No comparison results to display".dimmed());
        return;
    }

    // Group by prompt id, first-observed order
    let mut groups: Vec<(Option<i64>, Vec<&ResultView>)> = Vec::new();
    for result in &bundle.results {
        match groups.iter_mut().find(|(id, _)| *id == result.prompt_id) {
            Some((_, members)) => members.push(result),
            None => groups.push((result.prompt_id, vec![result])),
        }
    }

    for (_, members) in groups {
        println!();
        println!("  {}", members[0].prompt_label.magenta().bold());
        for result in members {
            println!();
            print_result(result, "    ");
        }
    }
}

/// History matrix: one block per model row, one entry per prompt column
pub fn print_matrix(matrix: &HistoryMatrix, input: &InputView, expand: bool) {
    print_input_header(input);

    if matrix.is_empty() {
        println!();
        println!(
            "{}",
            "No model-prompt combinations found with current filters".dimmed()
        );
        return;
    }

    for row in &matrix.rows {
        println!();
        println!("{}", row.model_name.cyan().bold());
        for (column, cell) in matrix.columns.iter().zip(&row.cells) {
            let versions = if column.has_versions() {
                let list: Vec<String> = column.versions.iter().map(|v| format!("v{}", v)).collect();
                format!(" [{}]", list.join(", "))
            } else {
                String::new()
            };
            println!("  {}{}", column.name.magenta(), versions.dimmed());

            match cell.latest() {
                Some(latest) => {
                    print_result(latest, "    ");
                    if cell.has_history() {
                        if expand {
                            for older in &cell.entries[1..] {
                                println!();
                                print_result(older, "      ");
                            }
                        } else {
                            println!(
                                "    {}",
                                format!("{} runs recorded (use --expand to list them)", cell.entries.len())
                                    .dimmed()
                            );
                        }
                    }
                }
                None => println!("    {}", "No results".dimmed()),
            }
        }
    }
}

/// History timeline: day headers, newest day first
pub fn print_timeline(days: &[TimelineDay], input: &InputView) {
    print_input_header(input);
    if days.is_empty() {
        println!();
        println!("{}", "No history available for this input".dimmed());
        return;
    }
    for day in days {
        println!();
        println!(
            "{} {}",
            day.label().bold(),
            format!("{} results", day.results.len()).dimmed()
        );
        for result in &day.results {
            println!();
            print_result(result, "  ");
        }
    }
}
