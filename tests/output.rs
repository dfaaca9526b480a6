use tenthousand::output::{command_name_from, format_human, HumanOutput};

#[test]
fn format_human_includes_sections() {
    let mut human = HumanOutput::new("pullups: 8/10000 (0.1%)");
    human.push_summary("completed", "8/10000");
    human.push_detail("created task file /tmp/2026/pullups.csv");
    human.push_warning("2025 is over; the goal was not reached");
    human.push_next_step("tenthousand progress pullups");

    let rendered = format_human(&human);
    assert!(rendered.contains("pullups: 8/10000 (0.1%)"));
    assert!(rendered.contains("Summary:"));
    assert!(rendered.contains("- completed: 8/10000"));
    assert!(rendered.contains("Details:"));
    assert!(rendered.contains("- created task file /tmp/2026/pullups.csv"));
    assert!(rendered.contains("Warnings:"));
    assert!(rendered.contains("Next steps:"));
    assert!(rendered.contains("- tenthousand progress pullups"));
}

#[test]
fn format_human_omits_empty_sections() {
    let human = HumanOutput::new("tenthousand list: 0 task(s) in 2026");
    let rendered = format_human(&human);
    assert_eq!(rendered, "tenthousand list: 0 task(s) in 2026");
}

#[test]
fn command_name_skips_flags_and_config_value() {
    let args = |list: &[&str]| list.iter().map(|s| s.to_string()).collect::<Vec<_>>();

    assert_eq!(command_name_from(args(&["add", "5", "pullups"])), "add");
    assert_eq!(
        command_name_from(args(&["--config", "/tmp/c.toml", "--json", "progress", "x"])),
        "progress"
    );
    assert_eq!(command_name_from(args(&["--json"])), "tenthousand");
}
