use crate::engine::{Ball, BallSortState};
use crate::error::MapError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// On-disk map layout: one string per tube, balls listed bottom to top.
///
/// ```json
/// { "capacity": 4, "tubes": ["RGBR", "GBRG", "BRGB", "", ""] }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapFile {
    pub capacity: usize,
    pub tubes: Vec<String>,
}

/// Parses tube strings into a `BallSortState`.
///
/// Each string is one tube, bottom ball first; an empty string is an empty
/// tube. Any character other than `.` or whitespace is a ball label.
///
/// # Returns
/// * `Ok(BallSortState)` if parsing is successful.
/// * `Err(MapError::InvalidMap)` if:
///     - `capacity` is zero or there are no tubes.
///     - A tube holds more than `capacity` balls.
///     - A tube contains `.` or whitespace.
///     - Some color has more balls than fit in one tube (unsolvable).
///
/// # Examples
/// ```
/// use ballsort_solver::utils::state_from_str_array;
///
/// let state = state_from_str_array(&["RB", "BR", ""], 2).unwrap();
/// assert_eq!(state.tubes()[0], vec!['R', 'B']);
/// assert!(state.tubes()[2].is_empty());
///
/// assert!(state_from_str_array(&["RRR"], 2).is_err());
/// assert!(state_from_str_array(&["R.B"], 3).is_err());
/// ```
pub fn state_from_str_array(s: &[&str], capacity: usize) -> Result<BallSortState, MapError> {
    if capacity == 0 {
        return Err(MapError::InvalidMap("capacity must be positive".to_string()));
    }
    if s.is_empty() {
        return Err(MapError::InvalidMap("map has no tubes".to_string()));
    }

    let mut tubes: Vec<Vec<Ball>> = Vec::with_capacity(s.len());
    for (t, tube_str) in s.iter().enumerate() {
        let tube: Vec<Ball> = tube_str.chars().collect();
        if let Some((c, &ball)) = tube
            .iter()
            .enumerate()
            .find(|(_, ball)| **ball == '.' || ball.is_whitespace())
        {
            return Err(MapError::InvalidMap(format!(
                "Unrecognized ball {:?} in tube {} position {}",
                ball,
                t + 1,
                c
            )));
        }
        if tube.len() > capacity {
            return Err(MapError::InvalidMap(format!(
                "Tube {} is too full. Expected at most {} balls, found {}",
                t + 1,
                capacity,
                tube.len()
            )));
        }
        tubes.push(tube);
    }

    let state =
        BallSortState::new(capacity, tubes).map_err(|e| MapError::InvalidMap(e.to_string()))?;
    let mut counts: Vec<(Ball, usize)> = state.color_counts().into_iter().collect();
    counts.sort_unstable();
    for (ball, count) in counts {
        if count > capacity {
            return Err(MapError::InvalidMap(format!(
                "color {ball:?} has {count} balls but a tube holds {capacity}"
            )));
        }
    }
    Ok(state)
}

/// Parses a JSON map (see [`MapFile`]).
pub fn parse_map_json(json: &str) -> Result<BallSortState, MapError> {
    let map: MapFile = serde_json::from_str(json)?;
    let tubes: Vec<&str> = map.tubes.iter().map(String::as_str).collect();
    state_from_str_array(&tubes, map.capacity)
}

/// Reads and parses a JSON map file.
pub fn load_map(path: &Path) -> Result<BallSortState, MapError> {
    let content = fs::read_to_string(path)?;
    parse_map_json(&content)
}

/// The `MapFile` describing `state`.
pub fn to_map_file(state: &BallSortState) -> MapFile {
    MapFile {
        capacity: state.capacity(),
        tubes: state
            .tubes()
            .iter()
            .map(|tube| tube.iter().collect())
            .collect(),
    }
}
