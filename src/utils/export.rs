use std::collections::HashSet;
use std::io::{Cursor, Write};

use chrono::{Datelike, NaiveDateTime, Timelike};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::ExportError;
use crate::models::Match;

const LEAGUE_HEADERS: [&str; 5] = ["DateTime", "Team 1", "Team 2", "Odds", "URL"];
const CONSOLIDATED_HEADERS: [&str; 6] = ["DateTime", "League", "Team 1", "Team 2", "Odds", "URL"];
const CONSOLIDATED_STEM: &str = "consolidated";

/// Matches sharing one league, keyed by the lower-cased label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeagueGroup {
    pub league: String,
    pub matches: Vec<Match>,
}

/// Column layout of a CSV export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableLayout {
    PerLeague,
    Consolidated,
}

/// One generated export file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub name: String,
    pub contents: Vec<u8>,
}

/// Partition matches by lower-cased league, groups in first-seen order
pub fn group_by_league(matches: &[Match]) -> Vec<LeagueGroup> {
    let mut groups: Vec<LeagueGroup> = Vec::new();
    for m in matches {
        let key = m.league.to_lowercase();
        match groups.iter_mut().find(|g| g.league == key) {
            Some(group) => group.matches.push(m.clone()),
            None => groups.push(LeagueGroup {
                league: key,
                matches: vec![m.clone()],
            }),
        }
    }
    groups
}

pub fn to_csv(matches: &[Match], layout: TableLayout) -> Result<String, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    match layout {
        TableLayout::PerLeague => writer.write_record(LEAGUE_HEADERS)?,
        TableLayout::Consolidated => writer.write_record(CONSOLIDATED_HEADERS)?,
    }

    for m in matches {
        let odds = m.odds_display();
        match layout {
            TableLayout::PerLeague => writer.write_record([
                m.datetime.as_str(),
                m.team1.as_str(),
                m.team2.as_str(),
                odds.as_str(),
                m.match_url.as_str(),
            ])?,
            TableLayout::Consolidated => writer.write_record([
                m.datetime.as_str(),
                m.league.as_str(),
                m.team1.as_str(),
                m.team2.as_str(),
                odds.as_str(),
                m.match_url.as_str(),
            ])?,
        }
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes)
        .map_err(|e| ExportError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// Pretty-printed JSON with the same field names and order as `Match`
pub fn to_json(matches: &[Match]) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(matches)?)
}

/// `YYYYMMDD_HHMM` stamp used in export file names
pub fn export_stamp(generated_at: NaiveDateTime) -> String {
    generated_at.format("%Y%m%d_%H%M").to_string()
}

/// Lower-cased league label that is safe to use in a file name
pub fn league_file_stem(league: &str) -> String {
    let stem: String = league
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if stem.is_empty() {
        "unknown".to_string()
    } else {
        stem
    }
}

/// One distinct stem per group, in group order.
///
/// Labels that differ only in case, spacing or punctuation share a base stem;
/// later groups get `_2`, `_3`, ... and no group may take the consolidated stem.
pub fn export_stems(groups: &[LeagueGroup]) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::from([CONSOLIDATED_STEM.to_string()]);
    groups
        .iter()
        .map(|group| {
            let base = league_file_stem(&group.league);
            let mut stem = base.clone();
            let mut suffix = 2;
            while !taken.insert(stem.clone()) {
                stem = format!("{}_{}", base, suffix);
                suffix += 1;
            }
            stem
        })
        .collect()
}

/// `{stem}_matches_{stamp}.{extension}`; `stem` comes from `export_stems`
pub fn league_file_name(stem: &str, generated_at: NaiveDateTime, extension: &str) -> String {
    format!(
        "{}_matches_{}.{}",
        stem,
        export_stamp(generated_at),
        extension
    )
}

pub fn consolidated_file_name(generated_at: NaiveDateTime, extension: &str) -> String {
    league_file_name(CONSOLIDATED_STEM, generated_at, extension)
}

pub fn archive_name(generated_at: NaiveDateTime) -> String {
    format!("odds_scraper_data_{}.zip", export_stamp(generated_at))
}

/// Per-league CSV and JSON for every group, then the consolidated pair
pub fn build_export_files(
    groups: &[LeagueGroup],
    consolidated: &[Match],
    generated_at: NaiveDateTime,
) -> Result<Vec<ExportFile>, ExportError> {
    let mut files = Vec::with_capacity(groups.len() * 2 + 2);

    for (group, stem) in groups.iter().zip(export_stems(groups)) {
        files.push(ExportFile {
            name: league_file_name(&stem, generated_at, "csv"),
            contents: to_csv(&group.matches, TableLayout::PerLeague)?.into_bytes(),
        });
        files.push(ExportFile {
            name: league_file_name(&stem, generated_at, "json"),
            contents: to_json(&group.matches)?.into_bytes(),
        });
    }

    files.push(ExportFile {
        name: consolidated_file_name(generated_at, "csv"),
        contents: to_csv(consolidated, TableLayout::Consolidated)?.into_bytes(),
    });
    files.push(ExportFile {
        name: consolidated_file_name(generated_at, "json"),
        contents: to_json(consolidated)?.into_bytes(),
    });

    Ok(files)
}

/// All export files in one zip archive.
///
/// Entries carry `generated_at` as their modification time, so the same input
/// and timestamp always give the same bytes.
pub fn bundle(
    groups: &[LeagueGroup],
    consolidated: &[Match],
    generated_at: NaiveDateTime,
) -> Result<Vec<u8>, ExportError> {
    let files = build_export_files(groups, consolidated, generated_at)?;

    let modified = zip::DateTime::from_date_and_time(
        u16::try_from(generated_at.year())
            .map_err(|e| ExportError::Timestamp(e.to_string()))?,
        generated_at.month() as u8,
        generated_at.day() as u8,
        generated_at.hour() as u8,
        generated_at.minute() as u8,
        generated_at.second() as u8,
    )
    .map_err(|e| ExportError::Timestamp(e.to_string()))?;

    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(modified);

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for file in &files {
        zip.start_file(file.name.as_str(), options)?;
        zip.write_all(&file.contents)?;
    }

    Ok(zip.finish()?.into_inner())
}
