use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str, TextStr};
use protocol::{Evaluation, RiskLevel};

use crate::text::{sanitize, text_width, truncate_chars, wrap, Font};
use crate::ReportError;

const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const MARGIN_X: f32 = 54.0;
const MARGIN_TOP: f32 = 36.0;
const MARGIN_BOTTOM: f32 = 48.0;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN_X;
const LABEL_WIDTH: f32 = 108.0;
const MAX_PAGES: usize = 40;
const MAX_ACTIONS: usize = 6;

const TITLE: u32 = 0x1E293B;
const MUTED: u32 = 0x64748B;
const ACCENT: u32 = 0x3B82F6;
const BODY: u32 = 0x374151;
const BORDER: u32 = 0xE2E8F0;
const FOOTER: u32 = 0x94A3B8;
const WHITE: u32 = 0xFFFFFF;

const DISCLAIMER: &str =
    "This report is for informational purposes only and does not constitute legal advice.";

pub fn level_color(level: RiskLevel) -> u32 {
    match level {
        RiskLevel::High => 0xDC2626,
        RiskLevel::Medium => 0xD97706,
        RiskLevel::Low => 0x059669,
    }
}

/// Renders the governance report for a completed evaluation.
///
/// The output depends only on `evaluation`: no clock reads and no random
/// document identifiers, so rendering twice yields identical bytes.
pub fn render_pdf(evaluation: &Evaluation) -> Result<Vec<u8>, ReportError> {
    let mut layout = Layout::new();
    write_header(&mut layout, evaluation)?;
    write_overview(&mut layout, evaluation)?;
    write_overall(&mut layout, evaluation)?;
    write_risks(&mut layout, evaluation)?;
    write_regulations(&mut layout, evaluation)?;
    write_actions(&mut layout, evaluation)?;
    write_footer(&mut layout)?;
    let pages = layout.finish();
    tracing::debug!(
        use_case = %evaluation.use_case.name(),
        pages = pages.len(),
        "governance report laid out"
    );
    Ok(assemble(&pages, evaluation))
}

fn write_header(layout: &mut Layout, evaluation: &Evaluation) -> Result<(), ReportError> {
    layout.line(Font::Bold, 22.0, TITLE, "GovLens Governance Report")?;
    layout.space(4.0);
    let generated = format!("Generated: {}", display_timestamp(&evaluation.generated_at));
    layout.line(Font::Regular, 11.0, MUTED, &generated)?;
    layout.space(8.0);
    layout.rule(2.0, ACCENT)?;
    layout.space(12.0);
    Ok(())
}

fn write_overview(layout: &mut Layout, evaluation: &Evaluation) -> Result<(), ReportError> {
    let use_case = &evaluation.use_case;
    layout.heading("Use Case Overview")?;
    let markets = use_case.markets().join(", ");
    let data_types = use_case.data_types().join(", ");
    let rows = [
        ("Use Case Name:", use_case.name()),
        ("Department:", use_case.department()),
        ("AI Techniques:", use_case.ai_techniques_label()),
        ("Deployment Stage:", use_case.stage_label()),
        ("Target Markets:", markets.as_str()),
        ("Data Types:", data_types.as_str()),
    ];
    for (label, value) in rows {
        layout.labeled(label, value, 10.0, TITLE)?;
    }
    layout.space(6.0);
    layout.line(Font::Bold, 10.0, MUTED, "Description:")?;
    layout.paragraph(Font::Regular, 10.0, BODY, use_case.description())?;
    Ok(())
}

fn write_overall(layout: &mut Layout, evaluation: &Evaluation) -> Result<(), ReportError> {
    let assessment = &evaluation.assessment;
    layout.heading("Overall Assessment")?;
    let score = format!("{}/100", assessment.overall_score());
    layout.labeled("Overall Score:", &score, 12.0, TITLE)?;
    layout.labeled(
        "Risk Level:",
        assessment.risk_level().as_str(),
        12.0,
        level_color(assessment.risk_level()),
    )?;
    layout.space(6.0);
    layout.paragraph(Font::Regular, 10.0, BODY, assessment.executive_summary())?;
    Ok(())
}

fn write_risks(layout: &mut Layout, evaluation: &Evaluation) -> Result<(), ReportError> {
    layout.heading("Risk Assessment")?;
    for (dimension, risk) in evaluation.assessment.risks().iter() {
        let title = format!("{}:", dimension.title());
        let value = format!("{}, score {}/100", risk.level, risk.score);
        layout.ensure(30.0)?;
        layout.labeled_with_width(&title, &value, 10.0, level_color(risk.level), 170.0)?;
        layout.paragraph(Font::Regular, 10.0, BODY, &risk.summary)?;
        if !risk.details.is_empty() {
            let details = format!("{}: {}", dimension.details_title(), risk.details.join("; "));
            layout.paragraph(Font::Regular, 9.0, MUTED, &details)?;
        }
        layout.space(6.0);
    }
    Ok(())
}

fn write_regulations(layout: &mut Layout, evaluation: &Evaluation) -> Result<(), ReportError> {
    let regulations = evaluation.assessment.applicable_regulations();
    layout.heading("Applicable Regulations")?;
    if regulations.is_empty() {
        layout.paragraph(Font::Regular, 10.0, MUTED, "None identified.")?;
        return Ok(());
    }
    for regulation in regulations {
        layout.paragraph(Font::Regular, 10.0, BODY, &format!("- {regulation}"))?;
    }
    Ok(())
}

fn write_actions(layout: &mut Layout, evaluation: &Evaluation) -> Result<(), ReportError> {
    let actions = evaluation.assessment.recommended_actions();
    layout.heading("Recommended Actions")?;
    if actions.is_empty() {
        layout.paragraph(Font::Regular, 10.0, MUTED, "No specific actions recommended.")?;
        return Ok(());
    }
    let widths = [43.0, 216.0, 130.0, CONTENT_WIDTH - 43.0 - 216.0 - 130.0];
    let header = ["Priority", "Action", "Regulation", "Owner"].map(str::to_string);
    layout.table_row(&widths, &header, true)?;
    for action in actions.iter().take(MAX_ACTIONS) {
        let cells = [
            action.priority_label(),
            truncate_chars(&action.action, 60),
            truncate_chars(action.regulation.as_deref().unwrap_or(""), 30),
            action.owner.clone().unwrap_or_default(),
        ];
        layout.table_row(&widths, &cells, false)?;
    }
    if actions.len() > MAX_ACTIONS {
        let more = format!(
            "{} further action(s) are listed in the JSON export.",
            actions.len() - MAX_ACTIONS
        );
        layout.space(4.0);
        layout.paragraph(Font::Regular, 9.0, MUTED, &more)?;
    }
    Ok(())
}

fn write_footer(layout: &mut Layout) -> Result<(), ReportError> {
    layout.space(24.0);
    layout.ensure(48.0)?;
    layout.rule(1.0, BORDER)?;
    layout.space(6.0);
    for text in [
        "Generated by GovLens - AI use case governance toolkit",
        DISCLAIMER,
    ] {
        layout.centered(Font::Regular, 8.0, FOOTER, text)?;
    }
    Ok(())
}

// "2026-10-15T14:03:22Z" -> "2026-10-15 14:03 UTC"
fn display_timestamp(rfc3339: &str) -> String {
    match (rfc3339.get(..10), rfc3339.get(11..16)) {
        (Some(date), Some(time)) => format!("{date} {time} UTC"),
        _ => rfc3339.to_string(),
    }
}

struct Layout {
    pages: Vec<Vec<u8>>,
    content: Content,
    cursor: f32,
}

impl Layout {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            content: Content::new(),
            cursor: PAGE_HEIGHT - MARGIN_TOP,
        }
    }

    fn finish(mut self) -> Vec<Vec<u8>> {
        self.close_page();
        self.pages
    }

    fn close_page(&mut self) {
        let number = format!("Page {}", self.pages.len() + 1);
        let width = text_width(&number, Font::Regular, 8.0);
        draw_text(
            &mut self.content,
            PAGE_WIDTH - MARGIN_X - width,
            MARGIN_BOTTOM / 2.0,
            Font::Regular,
            8.0,
            FOOTER,
            &number,
        );
        let content = std::mem::replace(&mut self.content, Content::new());
        self.pages.push(content.finish());
        self.cursor = PAGE_HEIGHT - MARGIN_TOP;
    }

    fn ensure(&mut self, height: f32) -> Result<(), ReportError> {
        if self.cursor - height >= MARGIN_BOTTOM {
            return Ok(());
        }
        if self.pages.len() + 1 >= MAX_PAGES {
            return Err(ReportError::TooLong { max_pages: MAX_PAGES });
        }
        self.close_page();
        Ok(())
    }

    fn space(&mut self, height: f32) {
        self.cursor -= height;
    }

    fn line(&mut self, font: Font, size: f32, color: u32, text: &str) -> Result<(), ReportError> {
        let height = size * 1.3;
        self.ensure(height)?;
        self.cursor -= size;
        draw_text(&mut self.content, MARGIN_X, self.cursor, font, size, color, &sanitize(text));
        self.cursor -= height - size;
        Ok(())
    }

    fn centered(&mut self, font: Font, size: f32, color: u32, text: &str) -> Result<(), ReportError> {
        let height = size * 1.5;
        self.ensure(height)?;
        self.cursor -= size;
        let clean = sanitize(text);
        let x = MARGIN_X + (CONTENT_WIDTH - text_width(&clean, font, size)).max(0.0) / 2.0;
        draw_text(&mut self.content, x, self.cursor, font, size, color, &clean);
        self.cursor -= height - size;
        Ok(())
    }

    fn paragraph(&mut self, font: Font, size: f32, color: u32, text: &str) -> Result<(), ReportError> {
        for line in wrap(text, font, size, CONTENT_WIDTH) {
            self.line(font, size, color, &line)?;
        }
        self.space(size * 0.4);
        Ok(())
    }

    fn heading(&mut self, text: &str) -> Result<(), ReportError> {
        self.space(14.0);
        // Keep a heading together with at least two lines of what follows.
        self.ensure(14.0 * 1.3 + 30.0)?;
        self.line(Font::Bold, 14.0, ACCENT, text)?;
        self.space(4.0);
        Ok(())
    }

    fn labeled(&mut self, label: &str, value: &str, size: f32, color: u32) -> Result<(), ReportError> {
        self.labeled_with_width(label, value, size, color, LABEL_WIDTH)
    }

    fn labeled_with_width(
        &mut self,
        label: &str,
        value: &str,
        size: f32,
        color: u32,
        label_width: f32,
    ) -> Result<(), ReportError> {
        let height = size * 1.45;
        let lines = wrap(value, Font::Regular, size, CONTENT_WIDTH - label_width);
        for (idx, line) in lines.iter().enumerate() {
            self.ensure(height)?;
            self.cursor -= size;
            if idx == 0 {
                draw_text(
                    &mut self.content,
                    MARGIN_X,
                    self.cursor,
                    Font::Bold,
                    size,
                    MUTED,
                    &sanitize(label),
                );
            }
            draw_text(
                &mut self.content,
                MARGIN_X + label_width,
                self.cursor,
                Font::Regular,
                size,
                color,
                line,
            );
            self.cursor -= height - size;
        }
        Ok(())
    }

    fn rule(&mut self, thickness: f32, color: u32) -> Result<(), ReportError> {
        self.ensure(thickness)?;
        let (r, g, b) = rgb(color);
        self.content.set_stroke_rgb(r, g, b);
        self.content.set_line_width(thickness);
        self.content.move_to(MARGIN_X, self.cursor);
        self.content.line_to(MARGIN_X + CONTENT_WIDTH, self.cursor);
        self.content.stroke();
        self.cursor -= thickness;
        Ok(())
    }

    fn table_row(&mut self, widths: &[f32; 4], cells: &[String; 4], header: bool) -> Result<(), ReportError> {
        let size = 9.0;
        let line_height = size * 1.3;
        let padding = 5.0;
        let font = if header { Font::Bold } else { Font::Regular };
        let wrapped: Vec<Vec<String>> = cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, width)| wrap(cell, font, size, width - 2.0 * padding))
            .collect();
        let rows = wrapped.iter().map(Vec::len).max().unwrap_or(1).max(1);
        let height = rows as f32 * line_height + 2.0 * padding;
        self.ensure(height)?;

        let top = self.cursor;
        let bottom = top - height;
        if header {
            let (r, g, b) = rgb(ACCENT);
            self.content.set_fill_rgb(r, g, b);
            self.content.rect(MARGIN_X, bottom, CONTENT_WIDTH, height);
            self.content.fill_nonzero();
        }
        let (r, g, b) = rgb(BORDER);
        self.content.set_stroke_rgb(r, g, b);
        self.content.set_line_width(0.5);
        let mut x = MARGIN_X;
        for (lines, width) in wrapped.iter().zip(widths.iter()) {
            self.content.rect(x, bottom, *width, height);
            self.content.stroke();
            let mut y = top - padding - size;
            for line in lines {
                let color = if header { WHITE } else { TITLE };
                draw_text(&mut self.content, x + padding, y, font, size, color, line);
                y -= line_height;
            }
            x += width;
        }
        self.cursor = bottom;
        Ok(())
    }
}

fn draw_text(content: &mut Content, x: f32, y: f32, font: Font, size: f32, color: u32, text: &str) {
    if text.is_empty() {
        return;
    }
    let (r, g, b) = rgb(color);
    content.set_fill_rgb(r, g, b);
    content.begin_text();
    content.set_font(Name(font.resource_name()), size);
    content.next_line(x, y);
    content.show(Str(text.as_bytes()));
    content.end_text();
}

fn rgb(color: u32) -> (f32, f32, f32) {
    let r = ((color >> 16) & 0xFF) as f32 / 255.0;
    let g = ((color >> 8) & 0xFF) as f32 / 255.0;
    let b = (color & 0xFF) as f32 / 255.0;
    (r, g, b)
}

fn assemble(pages: &[Vec<u8>], evaluation: &Evaluation) -> Vec<u8> {
    let catalog_id = Ref::new(1);
    let page_tree_id = Ref::new(2);
    let regular_id = Ref::new(3);
    let bold_id = Ref::new(4);
    let info_id = Ref::new(5);
    let page_ids: Vec<Ref> = (0..pages.len())
        .map(|idx| Ref::new(6 + 2 * idx as i32))
        .collect();

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id)
        .kids(page_ids.iter().copied())
        .count(page_ids.len() as i32);

    for (page_id, data) in page_ids.iter().zip(pages) {
        let content_id = Ref::new(page_id.get() + 1);
        {
            let mut page = pdf.page(*page_id);
            page.media_box(Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT));
            page.parent(page_tree_id);
            page.contents(content_id);
            page.resources()
                .fonts()
                .pair(Name(Font::Regular.resource_name()), regular_id)
                .pair(Name(Font::Bold.resource_name()), bold_id);
        }
        pdf.stream(content_id, data);
    }

    pdf.type1_font(regular_id).base_font(Name(b"Helvetica"));
    pdf.type1_font(bold_id).base_font(Name(b"Helvetica-Bold"));

    let title = sanitize(&format!(
        "GovLens Governance Report - {}",
        evaluation.use_case.name()
    ));
    pdf.document_info(info_id)
        .title(TextStr(&title))
        .producer(TextStr("GovLens"));

    pdf.finish()
}
