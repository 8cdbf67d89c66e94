//! File I/O for observation lists
//!
//! Format: one observation per line, `<px>, <py>, <pz> @ <vx>, <vy>, <vz>`,
//! all six fields integers. Surrounding whitespace is ignored and empty lines
//! are skipped.

use super::{ObservedPoint, Vec3};
use anyhow::{Context, Result};
use std::path::Path;

/// Load a list of observed points from a text file
pub fn load_observations_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<ObservedPoint>> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read observations file: {}", path.as_ref().display()))?;

    parse_observations(&content)
        .with_context(|| format!("Failed to parse observations from file: {}", path.as_ref().display()))
}

/// Parse a full observation list from a string
pub fn parse_observations(content: &str) -> Result<Vec<ObservedPoint>> {
    let mut points = Vec::new();

    for (line_idx, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let point = parse_observation(line)
            .with_context(|| format!("Invalid observation on line {}: '{}'", line_idx + 1, line))?;
        points.push(point);
    }

    if points.is_empty() {
        anyhow::bail!("Observations file is empty or contains no valid lines");
    }

    Ok(points)
}

/// Parse a single `position @ velocity` line
pub fn parse_observation(line: &str) -> Result<ObservedPoint> {
    let (pos_part, vel_part) = line
        .split_once('@')
        .context("Missing '@' separator between position and velocity")?;

    let position = parse_vec3(pos_part).context("Invalid position")?;
    let velocity = parse_vec3(vel_part).context("Invalid velocity")?;

    Ok(ObservedPoint::new(position, velocity))
}

/// Parse three comma-separated integers into a Vec3
fn parse_vec3(text: &str) -> Result<Vec3> {
    let fields: Vec<&str> = text.split(',').map(|f| f.trim()).collect();

    if fields.len() != 3 {
        anyhow::bail!("Expected 3 comma-separated integers, got {} field(s)", fields.len());
    }

    let mut values = [0i64; 3];
    for (i, field) in fields.iter().enumerate() {
        values[i] = field
            .parse::<i64>()
            .with_context(|| format!("'{}' is not an integer", field))?;
    }

    Ok(Vec3::new(values[0], values[1], values[2]))
}

/// Save observed points to a text file, one per line
pub fn save_observations_to_file<P: AsRef<Path>>(points: &[ObservedPoint], path: P) -> Result<()> {
    let content = observations_to_string(points);

    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write observations to file: {}", path.as_ref().display()))?;

    Ok(())
}

/// Render observed points in the input line format
pub fn observations_to_string(points: &[ObservedPoint]) -> String {
    let mut result = String::new();
    for point in points {
        result.push_str(&point.to_string());
        result.push('\n');
    }
    result
}

/// Create example observation files for testing and setup
pub fn create_example_observations<P: AsRef<Path>>(output_dir: P) -> Result<()> {
    let dir = output_dir.as_ref();
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    // Five observations with a known intersecting trajectory (24, 13, 10 @ -3, 1, 2)
    let example_content = "\
19, 13, 30 @ -2, 1, -2
18, 19, 22 @ -1, -1, -2
20, 25, 34 @ -2, -2, -4
12, 31, 28 @ -1, -2, -1
20, 19, 15 @ 1, -5, -3
";
    std::fs::write(dir.join("example.txt"), example_content)
        .context("Failed to write example.txt")?;

    // Minimal determined case: just the first three observations
    let minimal_content = "\
19, 13, 30 @ -2, 1, -2
18, 19, 22 @ -1, -1, -2
20, 25, 34 @ -2, -2, -4
";
    std::fs::write(dir.join("minimal.txt"), minimal_content)
        .context("Failed to write minimal.txt")?;

    // Degenerate case: every observation shares the same velocity
    let parallel_content = "\
0, 0, 0 @ 1, 2, 3
10, 0, 0 @ 1, 2, 3
0, 10, 0 @ 1, 2, 3
";
    std::fs::write(dir.join("parallel.txt"), parallel_content)
        .context("Failed to write parallel.txt")?;

    Ok(())
}
