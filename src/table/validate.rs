use crate::domain::models::{EpisodeRecord, Exclusion, Field};

#[derive(Debug, Default)]
pub struct Validated {
    pub kept: Vec<EpisodeRecord>,
    pub excluded: Vec<Exclusion>,
}

/// Splits `records` into those carrying every `required` field and an
/// exclusion per record that does not. A record is reported once, against
/// the first missing field in `required` order. Relative order is kept.
pub fn require(records: Vec<EpisodeRecord>, required: &[Field]) -> Validated {
    let mut validated = Validated::default();

    for record in records {
        match required.iter().find(|field| !has_field(&record, **field)) {
            Some(missing) => validated.excluded.push(Exclusion {
                show: record.show,
                season: record.season,
                episode: record.episode,
                missing: *missing,
            }),
            None => validated.kept.push(record),
        }
    }

    validated
}

fn has_field(record: &EpisodeRecord, field: Field) -> bool {
    match field {
        Field::Rating => record.rating.is_some(),
        Field::AirDate => record.air_date.is_some(),
    }
}

pub fn log_exclusions(context: &str, excluded: &[Exclusion]) {
    if excluded.is_empty() {
        return;
    }
    log::info!("{context}: excluded {} episode(s)", excluded.len());
    for exclusion in excluded {
        log::debug!("  {exclusion}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(episode: u32, rating: Option<f64>, date: Option<&str>) -> EpisodeRecord {
        EpisodeRecord {
            show: "Show".to_string(),
            season: 1,
            episode,
            rating,
            air_date: date.map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap()),
            title: format!("Episode {episode}"),
        }
    }

    #[test]
    fn test_require_reports_each_excluded_row() {
        let records = vec![
            record(1, Some(8.0), Some("2020-01-01")),
            record(2, None, Some("2020-01-08")),
            record(3, Some(7.0), None),
            record(4, None, None),
        ];

        let validated = require(records, &[Field::AirDate, Field::Rating]);

        assert_eq!(validated.kept.len(), 1);
        assert_eq!(validated.kept[0].episode, 1);
        let missing: Vec<(u32, Field)> = validated
            .excluded
            .iter()
            .map(|e| (e.episode, e.missing))
            .collect();
        assert_eq!(
            missing,
            vec![
                (2, Field::Rating),
                (3, Field::AirDate),
                (4, Field::AirDate),
            ]
        );
    }

    #[test]
    fn test_require_rating_only_keeps_undated_rows() {
        let records = vec![record(1, Some(8.0), None), record(2, None, None)];

        let validated = require(records, &[Field::Rating]);

        assert_eq!(validated.kept.len(), 1);
        assert_eq!(validated.excluded.len(), 1);
        assert_eq!(validated.excluded[0].missing, Field::Rating);
    }

    #[test]
    fn test_require_nothing_keeps_everything() {
        let validated = require(vec![record(1, None, None)], &[]);
        assert_eq!(validated.kept.len(), 1);
        assert!(validated.excluded.is_empty());
    }
}
