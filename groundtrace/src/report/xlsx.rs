//! Excel export of a grounding run
//!
//! Sheets:
//! - `Grounding List`: one row per grounding record
//! - `Topology Summary`: one row per ground terminal
//! - `Diagnostics`: skipped wire rows and conflicting lookups (optional)

use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use std::path::Path;

use crate::core::{GroundTraceError, GroundingResult};
use crate::harness::grounding::AmbiguityKind;
use crate::harness::schema::TopologyType;

pub const GROUNDING_SHEET: &str = "Grounding List";
pub const SUMMARY_SHEET: &str = "Topology Summary";
pub const DIAGNOSTICS_SHEET: &str = "Diagnostics";

pub const GROUNDING_HEADERS: [&str; 7] = [
    "Ground Terminal",
    "Connector",
    "Description",
    "Pin",
    "Wire Gauge",
    "Option",
    "Topology Type",
];

pub const SUMMARY_HEADERS: [&str; 5] = [
    "Ground Terminal",
    "Topology Type",
    "Connector Count",
    "Connectors",
    "Shared With",
];

const DIAGNOSTICS_HEADERS: [&str; 4] = ["Kind", "Location", "Detail", "Candidates"];

struct ReportFormats {
    header: Format,
    text: Format,
    number: Format,
    single: Format,
    bus: Format,
    unknown: Format,
}

impl ReportFormats {
    fn new() -> Self {
        let header = Format::new()
            .set_bold()
            .set_align(FormatAlign::Center)
            .set_background_color(Color::RGB(0xD9E1F2))
            .set_border(FormatBorder::Thin);
        let text = Format::new().set_border(FormatBorder::Thin);
        let number = Format::new()
            .set_border(FormatBorder::Thin)
            .set_align(FormatAlign::Right);
        let single = Format::new()
            .set_border(FormatBorder::Thin)
            .set_background_color(Color::RGB(0xE2EFDA));
        let bus = Format::new()
            .set_border(FormatBorder::Thin)
            .set_background_color(Color::RGB(0xFCE4D6));
        let unknown = Format::new()
            .set_border(FormatBorder::Thin)
            .set_font_color(Color::RGB(0x808080));

        Self {
            header,
            text,
            number,
            single,
            bus,
            unknown,
        }
    }

    fn topology(&self, topology: TopologyType) -> &Format {
        match topology {
            TopologyType::SingleCircuit => &self.single,
            TopologyType::MultiCircuitBus => &self.bus,
            TopologyType::Unknown => &self.unknown,
        }
    }
}

/// Writes a [`GroundingResult`] as an `.xlsx` workbook.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    include_diagnostics: bool,
}

impl Default for ReportWriter {
    fn default() -> Self {
        Self {
            include_diagnostics: true,
        }
    }
}

impl ReportWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_diagnostics(mut self, include: bool) -> Self {
        self.include_diagnostics = include;
        self
    }

    pub fn write(&self, result: &GroundingResult, path: &Path) -> Result<(), GroundTraceError> {
        let mut workbook = self.build(result)?;
        workbook.save(path)?;
        Ok(())
    }

    pub fn render_to_bytes(&self, result: &GroundingResult) -> Result<Vec<u8>, GroundTraceError> {
        let mut workbook = self.build(result)?;
        Ok(workbook.save_to_buffer()?)
    }

    fn build(&self, result: &GroundingResult) -> Result<Workbook, GroundTraceError> {
        let mut workbook = Workbook::new();
        let formats = ReportFormats::new();

        self.add_grounding_sheet(&mut workbook, result, &formats)?;
        self.add_summary_sheet(&mut workbook, result, &formats)?;
        if self.include_diagnostics && result.has_diagnostics() {
            self.add_diagnostics_sheet(&mut workbook, result, &formats)?;
        }

        Ok(workbook)
    }

    fn add_grounding_sheet(
        &self,
        workbook: &mut Workbook,
        result: &GroundingResult,
        formats: &ReportFormats,
    ) -> Result<(), GroundTraceError> {
        let sheet = workbook.add_worksheet();
        sheet.set_name(GROUNDING_SHEET)?;
        write_headers(sheet, &GROUNDING_HEADERS, &formats.header)?;

        for (i, record) in result.records.iter().enumerate() {
            let row = i as u32 + 1;
            let cells = [
                &record.ground_terminal,
                &record.connector,
                &record.description,
                &record.pin,
                &record.wire_gauge,
                &record.option,
            ];
            for (col, value) in cells.iter().enumerate() {
                sheet.write_with_format(row, col as u16, value.as_str(), &formats.text)?;
            }
            sheet.write_with_format(
                row,
                6,
                record.topology.as_str(),
                formats.topology(record.topology),
            )?;
        }

        for (col, width) in [16, 14, 30, 8, 12, 14, 20].iter().enumerate() {
            sheet.set_column_width(col as u16, *width)?;
        }
        sheet.set_freeze_panes(1, 0)?;
        if !result.records.is_empty() {
            sheet.autofilter(0, 0, result.records.len() as u32, 6)?;
        }

        Ok(())
    }

    fn add_summary_sheet(
        &self,
        workbook: &mut Workbook,
        result: &GroundingResult,
        formats: &ReportFormats,
    ) -> Result<(), GroundTraceError> {
        let sheet = workbook.add_worksheet();
        sheet.set_name(SUMMARY_SHEET)?;
        write_headers(sheet, &SUMMARY_HEADERS, &formats.header)?;

        for (i, summary) in result.topology.iter().enumerate() {
            let row = i as u32 + 1;
            sheet.write_with_format(row, 0, summary.ground.as_str(), &formats.text)?;
            sheet.write_with_format(
                row,
                1,
                summary.topology.as_str(),
                formats.topology(summary.topology),
            )?;
            sheet.write_with_format(row, 2, summary.connector_count as u32, &formats.number)?;
            sheet.write_with_format(row, 3, summary.connectors.join(", "), &formats.text)?;
            sheet.write_with_format(row, 4, summary.shared_with.join(", "), &formats.text)?;
        }

        let footer = result.topology.len() as u32 + 2;
        sheet.write_with_format(footer, 0, "Generated", &formats.header)?;
        sheet.write_with_format(
            footer,
            1,
            result.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            &formats.text,
        )?;

        for (col, width) in [16, 20, 16, 50, 24].iter().enumerate() {
            sheet.set_column_width(col as u16, *width)?;
        }
        sheet.set_freeze_panes(1, 0)?;

        Ok(())
    }

    fn add_diagnostics_sheet(
        &self,
        workbook: &mut Workbook,
        result: &GroundingResult,
        formats: &ReportFormats,
    ) -> Result<(), GroundTraceError> {
        let sheet = workbook.add_worksheet();
        sheet.set_name(DIAGNOSTICS_SHEET)?;
        write_headers(sheet, &DIAGNOSTICS_HEADERS, &formats.header)?;

        let mut row = 1u32;
        for skipped in &result.skipped {
            sheet.write_with_format(row, 0, "skipped row", &formats.text)?;
            sheet.write_with_format(row, 1, format!("wire list row {}", skipped.row), &formats.text)?;
            sheet.write_with_format(row, 2, skipped.reason.to_string(), &formats.text)?;
            sheet.write_with_format(row, 3, "", &formats.text)?;
            row += 1;
        }
        for ambiguity in &result.ambiguities {
            let kind = match ambiguity.kind {
                AmbiguityKind::Description => "ambiguous description",
                AmbiguityKind::WireAttributes => "ambiguous wire",
            };
            sheet.write_with_format(row, 0, kind, &formats.text)?;
            sheet.write_with_format(row, 1, ambiguity.key.as_str(), &formats.text)?;
            sheet.write_with_format(row, 2, format!("using '{}'", ambiguity.chosen), &formats.text)?;
            sheet.write_with_format(row, 3, ambiguity.candidates.join(" | "), &formats.text)?;
            row += 1;
        }

        for (col, width) in [22, 20, 30, 50].iter().enumerate() {
            sheet.set_column_width(col as u16, *width)?;
        }

        Ok(())
    }
}

fn write_headers(sheet: &mut Worksheet, headers: &[&str], format: &Format) -> Result<(), GroundTraceError> {
    for (col, header) in headers.iter().enumerate() {
        sheet.write_with_format(0, col as u16, *header, format)?;
    }
    Ok(())
}
