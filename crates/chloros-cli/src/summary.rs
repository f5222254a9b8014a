use std::path::Path;

use chloros_core::fluor::{EfficiencyMap, FluorStack};
use console::Style;

struct Styles {
    title: Style,
    label: Style,
    value: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_analysis_summary(
    sample: &str,
    stack: &FluorStack,
    map: &EfficiencyMap,
    observations: usize,
    outdir: &Path,
) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Chloros YII Analysis"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(20)));
    println!();

    println!(
        "  {:<16}{}",
        s.label.apply_to("Sample"),
        s.value.apply_to(sample)
    );
    println!(
        "  {:<16}{}",
        s.label.apply_to("Protocol"),
        s.value.apply_to(stack.protocol.to_string())
    );
    println!(
        "  {:<16}{}",
        s.label.apply_to("Image size"),
        s.value.apply_to(format!("{}x{}", stack.width(), stack.height()))
    );
    println!(
        "  {:<16}{}",
        s.label.apply_to("Measurements"),
        s.value.apply_to(map.measurement_count().to_string())
    );
    println!(
        "  {:<16}{}",
        s.label.apply_to("Observations"),
        s.value.apply_to(observations.to_string())
    );
    println!(
        "  {:<16}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(outdir.display().to_string())
    );
    println!();
}
