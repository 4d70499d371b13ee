use std::path::{Path, PathBuf};

/// PNG path for a chart named after `title`.
pub fn chart_path(directory: &Path, title: &str) -> PathBuf {
    directory.join(format!("{}.png", sanitize_filename(title)))
}

fn sanitize_filename(name: &str) -> String {
    // Remove or replace invalid filename characters
    let cleaned = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            c => c,
        })
        .collect::<String>()
        .trim()
        .to_string();

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        "untitled".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("Normal Name"), "Normal Name");
        assert_eq!(sanitize_filename("Name/With/Slashes"), "Name-With-Slashes");
        assert_eq!(
            sanitize_filename("Name\\With\\Backslashes"),
            "Name-With-Backslashes"
        );
        assert_eq!(sanitize_filename("Name:With:Colons"), "Name-With-Colons");
        assert_eq!(sanitize_filename("Name*With*Stars"), "Name-With-Stars");
        assert_eq!(
            sanitize_filename("Name?With?Questions"),
            "Name-With-Questions"
        );
        assert_eq!(sanitize_filename("Name\"With\"Quotes"), "Name-With-Quotes");
        assert_eq!(sanitize_filename("Name|With|Pipes"), "Name-With-Pipes");
        assert_eq!(sanitize_filename("  Trim Me  "), "Trim Me");
    }

    #[test]
    fn test_sanitize_filename_never_empty() {
        assert_eq!(sanitize_filename("   "), "untitled");
        assert_eq!(sanitize_filename(".."), "untitled");
    }

    #[test]
    fn test_chart_path() {
        assert_eq!(
            chart_path(Path::new("Graphs/Series Summaries"), "Star Trek: The Next Generation"),
            PathBuf::from("Graphs/Series Summaries/Star Trek- The Next Generation.png")
        );
        assert_eq!(
            chart_path(Path::new("Graphs"), "Highest Rated"),
            PathBuf::from("Graphs/Highest Rated.png")
        );
    }
}
