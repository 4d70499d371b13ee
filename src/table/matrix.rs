use std::collections::BTreeMap;

use crate::domain::models::EpisodeRecord;

/// Season × episode grid of mean ratings.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingMatrix {
    pub seasons: Vec<u32>,
    pub episodes: Vec<u32>,
    /// `cells[row][col]`, row per episode, column per season
    pub cells: Vec<Vec<Option<f64>>>,
}

impl RatingMatrix {
    /// Pivots the rated records; several records for the same cell are
    /// averaged, unrated records are ignored.
    pub fn pivot(records: &[EpisodeRecord]) -> Self {
        let mut sums: BTreeMap<(u32, u32), (f64, u32)> = BTreeMap::new();
        for record in records {
            if let Some(rating) = record.rating {
                let entry = sums.entry((record.episode, record.season)).or_default();
                entry.0 += rating;
                entry.1 += 1;
            }
        }

        let mut seasons: Vec<u32> = sums.keys().map(|(_, season)| *season).collect();
        seasons.sort_unstable();
        seasons.dedup();
        let mut episodes: Vec<u32> = sums.keys().map(|(episode, _)| *episode).collect();
        episodes.dedup();

        let cells = episodes
            .iter()
            .map(|episode| {
                seasons
                    .iter()
                    .map(|season| {
                        sums.get(&(*episode, *season))
                            .map(|(sum, n)| sum / f64::from(*n))
                    })
                    .collect()
            })
            .collect();

        Self {
            seasons,
            episodes,
            cells,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.seasons.is_empty()
    }

    pub fn column_of(&self, season: u32) -> Option<usize> {
        self.seasons.binary_search(&season).ok()
    }

    pub fn row_of(&self, episode: u32) -> Option<usize> {
        self.episodes.binary_search(&episode).ok()
    }

    /// Mean of the filled cells in each season column.
    pub fn season_means(&self) -> Vec<Option<f64>> {
        (0..self.seasons.len())
            .map(|col| {
                let filled: Vec<f64> = self.cells.iter().filter_map(|row| row[col]).collect();
                if filled.is_empty() {
                    None
                } else {
                    Some(filled.iter().sum::<f64>() / filled.len() as f64)
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    impl RatingMatrix {
        fn get(&self, season: u32, episode: u32) -> Option<f64> {
            let col = self.column_of(season)?;
            let row = self.row_of(episode)?;
            self.cells[row][col]
        }
    }

    fn rated(season: u32, episode: u32, rating: Option<f64>) -> EpisodeRecord {
        EpisodeRecord {
            show: "Show".to_string(),
            season,
            episode,
            rating,
            air_date: None,
            title: String::new(),
        }
    }

    #[test]
    fn test_pivot_layout_and_gaps() {
        let records = vec![
            rated(1, 1, Some(8.0)),
            rated(1, 2, Some(9.0)),
            rated(2, 1, Some(7.0)),
            rated(2, 2, None),
            rated(2, 3, Some(6.0)),
        ];

        let matrix = RatingMatrix::pivot(&records);

        assert_eq!(matrix.seasons, vec![1, 2]);
        assert_eq!(matrix.episodes, vec![1, 2, 3]);
        assert_eq!(
            matrix.cells,
            vec![
                vec![Some(8.0), Some(7.0)],
                vec![Some(9.0), None],
                vec![None, Some(6.0)],
            ]
        );
        assert_eq!(matrix.get(2, 3), Some(6.0));
        assert_eq!(matrix.get(3, 1), None);
    }

    #[test]
    fn test_pivot_averages_duplicates() {
        let records = vec![rated(1, 1, Some(8.0)), rated(1, 1, Some(9.0))];
        let matrix = RatingMatrix::pivot(&records);
        assert_eq!(matrix.get(1, 1), Some(8.5));
    }

    #[test]
    fn test_episode_zero_is_first_row() {
        let records = vec![rated(1, 1, Some(8.0)), rated(1, 0, Some(5.0))];
        let matrix = RatingMatrix::pivot(&records);
        assert_eq!(matrix.episodes, vec![0, 1]);
        assert_eq!(matrix.row_of(0), Some(0));
    }

    #[test]
    fn test_season_means_skip_gaps() {
        let records = vec![
            rated(1, 1, Some(8.0)),
            rated(1, 2, Some(6.0)),
            rated(2, 1, Some(9.0)),
        ];

        let matrix = RatingMatrix::pivot(&records);

        assert_eq!(matrix.season_means(), vec![Some(7.0), Some(9.0)]);
    }

    #[test]
    fn test_unrated_only_is_empty() {
        let matrix = RatingMatrix::pivot(&[rated(1, 1, None)]);
        assert!(matrix.is_empty());
        assert!(matrix.season_means().is_empty());
    }
}
