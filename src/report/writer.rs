use chrono::{NaiveDateTime, SubsecRound};
use rust_xlsxwriter::{Format, Workbook};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::collector::ReleaseRow;
use crate::config::DateRange;
use crate::error::Result;

pub const COLUMNS: [&str; 6] = ["DATE (UTC)", "AUTHOR", "TAG", "REPOSITORY", "NAME", "URL"];

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const XLSX_DATE_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";
const CSV_DELIMITER: u8 = b'|';

/// A row as it lands in the report: whole seconds, no offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRecord {
    pub published_at: NaiveDateTime,
    pub author_login: String,
    pub tag_name: String,
    pub repository_name: String,
    pub release_name: String,
    pub html_url: String,
}

impl ReportRecord {
    fn from_row(row: ReleaseRow) -> Self {
        Self {
            published_at: row.published_at.naive_utc().trunc_subsecs(0),
            author_login: row.author_login,
            tag_name: row.tag_name,
            repository_name: row.repository_name,
            release_name: row.release_name,
            html_url: row.html_url,
        }
    }

    fn fields(&self) -> [String; 6] {
        [
            self.published_at.format(DATE_FORMAT).to_string(),
            self.author_login.clone(),
            self.tag_name.clone(),
            self.repository_name.clone(),
            self.release_name.clone(),
            self.html_url.clone(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFiles {
    pub csv: PathBuf,
    pub xlsx: PathBuf,
}

/// Keeps rows strictly inside the range, oldest first. Rows published at the
/// same second stay in collection order.
pub fn prepare_records(rows: Vec<ReleaseRow>, range: &DateRange) -> Vec<ReportRecord> {
    let total = rows.len();
    let mut records: Vec<ReportRecord> = rows
        .into_iter()
        .map(ReportRecord::from_row)
        .filter(|r| range.contains(r.published_at))
        .collect();
    records.sort_by_key(|r| r.published_at);

    debug!(total, kept = records.len(), "filtered releases by date range");
    records
}

pub struct ReportWriter {
    output_dir: PathBuf,
    range: DateRange,
}

impl ReportWriter {
    pub fn new(output_dir: PathBuf, range: DateRange) -> Self {
        Self { output_dir, range }
    }

    pub fn files(&self) -> ReportFiles {
        let stem = self.range.file_stem();
        ReportFiles {
            csv: self.output_dir.join(format!("{}.csv", stem)),
            xlsx: self.output_dir.join(format!("{}.xlsx", stem)),
        }
    }

    /// Filters, sorts and writes both report files.
    pub fn write(&self, rows: Vec<ReleaseRow>) -> Result<ReportFiles> {
        let records = prepare_records(rows, &self.range);
        let files = self.files();

        std::fs::create_dir_all(&self.output_dir)?;

        info!("Saving data to {}", files.csv.display());
        write_csv(&files.csv, &records)?;

        info!("Saving data to {}", files.xlsx.display());
        write_xlsx(&files.xlsx, &records)?;

        Ok(files)
    }
}

fn write_csv(path: &Path, records: &[ReportRecord]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(CSV_DELIMITER)
        .from_path(path)?;

    writer.write_record(COLUMNS)?;
    for record in records {
        writer.write_record(record.fields())?;
    }
    writer.flush()?;
    Ok(())
}

fn write_xlsx(path: &Path, records: &[ReportRecord]) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    let header = Format::new().set_bold();
    let date = Format::new().set_num_format(XLSX_DATE_FORMAT);

    for (col, name) in COLUMNS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *name, &header)?;
    }
    worksheet.set_column_width(0, 20)?;

    for (idx, record) in records.iter().enumerate() {
        let row = idx as u32 + 1;
        worksheet.write_datetime_with_format(row, 0, &record.published_at, &date)?;
        worksheet.write_string(row, 1, &record.author_login)?;
        worksheet.write_string(row, 2, &record.tag_name)?;
        worksheet.write_string(row, 3, &record.repository_name)?;
        worksheet.write_string(row, 4, &record.release_name)?;
        worksheet.write_string(row, 5, &record.html_url)?;
    }

    workbook.save(path)?;
    Ok(())
}
