use anyhow::{bail, Result};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::domain::models::ShowRef;
use crate::infra::tmdb::{ShowSummary, TmdbClient};

/// Looks a show up by name, asking the user to choose when several match.
pub fn search_and_select_show(client: &TmdbClient, query: &str) -> Result<ShowRef> {
    let results = client.search_series(query)?;

    if results.is_empty() {
        bail!("No shows found matching '{query}'");
    }

    if results.len() == 1 {
        let only = &results[0];
        return Ok(ShowRef::new(only.id, only.name.clone()));
    }

    // Multiple results - let user select
    println!("Multiple shows found. Please select one:");
    for (i, result) in results.iter().enumerate() {
        println!("  {}", describe_choice(i + 1, result));
    }

    let mut rl = DefaultEditor::new()?;
    loop {
        let prompt = format!("Enter number (1-{}): ", results.len());
        match rl.readline(&prompt) {
            Ok(line) => match parse_choice(&line, results.len()) {
                Some(index) => {
                    let chosen = &results[index];
                    return Ok(ShowRef::new(chosen.id, chosen.name.clone()));
                }
                None => println!("Please enter a number between 1 and {}.", results.len()),
            },
            Err(ReadlineError::Interrupted) => bail!("Interrupted"),
            Err(ReadlineError::Eof) => bail!("EOF"),
            Err(err) => return Err(err.into()),
        }
    }
}

fn describe_choice(number: usize, show: &ShowSummary) -> String {
    let year = show
        .first_air_date
        .as_deref()
        .and_then(|date| date.get(..4))
        .filter(|year| !year.is_empty())
        .unwrap_or("????");
    format!("{number}: {} ({year}) (ID: {})", show.name, show.id)
}

/// Zero-based index for a 1-based answer, if it is in range.
fn parse_choice(input: &str, count: usize) -> Option<usize> {
    let choice: usize = input.trim().parse().ok()?;
    (1..=count).contains(&choice).then(|| choice - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_choice() {
        assert_eq!(parse_choice("1", 3), Some(0));
        assert_eq!(parse_choice(" 3\n", 3), Some(2));
        assert_eq!(parse_choice("0", 3), None);
        assert_eq!(parse_choice("4", 3), None);
        assert_eq!(parse_choice("two", 3), None);
        assert_eq!(parse_choice("", 3), None);
    }

    #[test]
    fn test_describe_choice() {
        let show = ShowSummary {
            id: 1396,
            name: "Breaking Bad".to_string(),
            first_air_date: Some("2008-01-20".to_string()),
        };
        assert_eq!(describe_choice(2, &show), "2: Breaking Bad (2008) (ID: 1396)");

        let undated = ShowSummary {
            first_air_date: Some(String::new()),
            ..show
        };
        assert_eq!(describe_choice(1, &undated), "1: Breaking Bad (????) (ID: 1396)");
    }
}
