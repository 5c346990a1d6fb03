/// Formats the progress line.
///
/// Raw output is the most recently added address alone. Verbose output is
/// `(completed/total) ` followed by every label, separated by `". "`.
pub fn render<S: AsRef<str>>(labels: &[S], completed: usize, total: usize, raw: bool) -> String {
    if raw {
        return labels
            .last()
            .map(|label| label.as_ref().to_string())
            .unwrap_or_default();
    }

    let labels: Vec<&str> = labels.iter().map(AsRef::as_ref).collect();
    // (1/4) 93.184.216.34, Norwell, United States
    format!("({}/{}) {}", completed, total, labels.join(". "))
}
