//! Integration tests for the Tabula table pipeline.
//!
//! These tests exercise the public surface from table construction (or
//! JSON input) to PDF output. They verify:
//! - Merged regions draw once, spanning their columns
//! - Embedding rejects bad coordinates and bad images without side effects
//! - Pagination is deterministic
//! - The style cascade gives per-cell styles final say
//! - PDF output is structurally valid

use base64::Engine as _;
use tabula::design::DesignConfig;
use tabula::style::{Alignment, CellStyle, ColorInput, Rgb};
use tabula::surface::{Document, DrawOp, ImagePlacement};
use tabula::{PdfTable, TableError, TableOptions};

// ─── Helpers ────────────────────────────────────────────────────

const ONE_PIXEL_PNG: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR4nGMAAQAABQABDQottAAAAABJRU5ErkJggg==";

fn make_table(rows: usize, columns: usize) -> PdfTable {
    PdfTable::new(TableOptions::new(rows, columns))
}

fn make_fixed_height_table(rows: usize, columns: usize) -> PdfTable {
    let design = DesignConfig {
        dynamic_row_height: Some(false),
        ..Default::default()
    };
    let mut table = PdfTable::new(TableOptions::new(rows, columns).with_design(design));
    for row in 0..rows {
        for col in 0..columns {
            table.set_cell(row, col, &format!("r{}c{}", row, col)).unwrap();
        }
    }
    table
}

fn page_texts(doc: &Document, index: usize) -> Vec<String> {
    doc.page(index)
        .unwrap()
        .texts()
        .map(|(text, _)| text.to_string())
        .collect()
}

fn filled_rect_widths(doc: &Document, index: usize) -> Vec<f64> {
    doc.page(index)
        .unwrap()
        .ops()
        .iter()
        .filter_map(|op| match op {
            DrawOp::Rect(rect) if rect.color.is_some() => Some(rect.width),
            _ => None,
        })
        .collect()
}

fn assert_valid_pdf(bytes: &[u8]) {
    assert!(bytes.len() > 50, "PDF too small to be valid");
    assert!(bytes.starts_with(b"%PDF-1.7"), "Missing PDF header");
    let text = String::from_utf8_lossy(bytes);
    assert!(text.contains("xref"), "Missing xref table");
    assert!(text.contains("trailer"), "Missing trailer");
    assert!(text.contains("/Type /Catalog"), "Missing catalog");
    assert!(text.trim_end().ends_with("%%EOF"), "Missing EOF marker");
}

// ─── Merged regions ─────────────────────────────────────────────

#[test]
fn test_merged_row_draws_anchor_only() {
    let mut table = make_table(2, 2);
    table.set_cell(0, 0, "A").unwrap();
    table.set_cell(0, 1, "B").unwrap();
    table.set_cell(1, 0, "C").unwrap();
    table.set_cell(1, 1, "D").unwrap();
    table.merge_cells(0, 0, 0, 1).unwrap();

    let doc = table.render_to_new_document().unwrap();
    assert_eq!(doc.page_count(), 1);
    assert_eq!(page_texts(&doc, 0), vec!["A", "C", "D"]);
    // One background spanning both columns, then one per cell in row 1
    assert_eq!(filled_rect_widths(&doc, 0), vec![160.0, 80.0, 80.0]);
}

#[test]
fn test_merged_region_spans_rows() {
    let design = DesignConfig {
        dynamic_row_height: Some(false),
        ..Default::default()
    };
    let mut table = PdfTable::new(TableOptions::new(3, 2).with_design(design));
    table.set_cell(0, 0, "tall").unwrap();
    table.set_cell(1, 0, "hidden").unwrap();
    table.merge_cells(0, 0, 1, 0).unwrap();

    let doc = table.render_to_new_document().unwrap();
    let anchor = doc
        .page(0)
        .unwrap()
        .ops()
        .iter()
        .find_map(|op| match op {
            DrawOp::Rect(rect) if rect.color.is_some() => Some(rect.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!((anchor.width, anchor.height), (80.0, 40.0));
    assert!(!page_texts(&doc, 0).contains(&"hidden".to_string()));
}

#[test]
fn test_tall_anchor_breaks_on_its_own_row_height() {
    let mut table = make_fixed_height_table(38, 2);
    table.merge_cells(36, 0, 37, 0).unwrap();

    let doc = table.render_to_new_document().unwrap();
    assert_eq!(doc.page_count(), 2);
    // Row 36 fits on the first page by itself and keeps its full span
    let anchor = doc
        .page(0)
        .unwrap()
        .ops()
        .iter()
        .filter_map(|op| match op {
            DrawOp::Rect(rect) if rect.color.is_some() && rect.width == 80.0 && rect.height == 40.0 => {
                Some(rect.clone())
            }
            _ => None,
        })
        .last()
        .unwrap();
    assert!(anchor.y < 50.0);
    assert!(page_texts(&doc, 0).contains(&"r36c0".to_string()));
    assert_eq!(page_texts(&doc, 1), vec!["r37c1"]);
}

// ─── Embedding ──────────────────────────────────────────────────

#[test]
fn test_negative_coordinates_leave_document_untouched() {
    let table = make_table(2, 2);
    let mut doc = Document::new();
    doc.add_page();

    let err = table.embed_into(&mut doc, -1.0, -1.0).unwrap_err();
    assert!(matches!(err, TableError::InvalidCoordinate { .. }));
    assert_eq!(doc.page_count(), 1);
    assert!(doc.page(0).unwrap().ops().is_empty());

    let mut empty = Document::new();
    assert!(table.embed_into(&mut empty, 10.0, -5.0).is_err());
    assert_eq!(empty.page_count(), 0);
}

#[test]
fn test_embed_into_uses_last_page() {
    let mut table = make_table(1, 1);
    table.set_cell(0, 0, "here").unwrap();
    let mut doc = Document::new();
    doc.add_page();
    doc.add_page();

    table.embed_into(&mut doc, 100.0, 400.0).unwrap();
    assert_eq!(doc.page_count(), 2);
    assert!(page_texts(&doc, 0).is_empty());
    assert_eq!(page_texts(&doc, 1), vec!["here"]);
}

#[test]
fn test_image_without_png_signature_is_rejected() {
    let table = make_table(1, 1);
    let mut doc = Document::new();
    let placement = ImagePlacement {
        x: 50.0,
        y: 500.0,
        width: 100.0,
        height: 100.0,
    };

    let err = table
        .embed_as_image(&mut doc, b"\xff\xd8\xff\xe0 not a png", placement)
        .unwrap_err();
    assert!(matches!(err, TableError::InvalidImageData(_)));
    assert_eq!(doc.page_count(), 0);
}

#[test]
fn test_png_is_placed_on_a_new_page() {
    let png = base64::engine::general_purpose::STANDARD
        .decode(ONE_PIXEL_PNG)
        .unwrap();
    let table = make_table(1, 1);
    let mut doc = Document::new();
    let placement = ImagePlacement {
        x: 50.0,
        y: 500.0,
        width: 100.0,
        height: 100.0,
    };

    table.embed_as_image(&mut doc, &png, placement).unwrap();
    assert_eq!(doc.page_count(), 1);
    assert!(matches!(
        doc.page(0).unwrap().ops(),
        [DrawOp::Image { placement: p, .. }] if *p == placement
    ));
    assert_valid_pdf(&doc.save().unwrap());
}

// ─── Pagination ─────────────────────────────────────────────────

#[test]
fn test_hundred_rows_paginate_deterministically() {
    let table = make_fixed_height_table(100, 3);
    let first = table.render_to_new_document().unwrap();
    let second = table.render_to_new_document().unwrap();

    // 741.89pt usable per A4 page at 20pt a row
    let usable: f64 = 841.89 - 50.0 - 50.0;
    let expected = (100.0 * 20.0 / usable).ceil() as usize;
    assert_eq!(first.page_count(), expected);
    assert_eq!(first.page_count(), second.page_count());
    for page in 0..first.page_count() {
        assert_eq!(page_texts(&first, page), page_texts(&second, page));
    }

    let drawn: usize = (0..first.page_count())
        .map(|p| page_texts(&first, p).len())
        .sum();
    assert_eq!(drawn, 300);
}

#[test]
fn test_header_rows_repeat_on_every_page() {
    let table = {
        let design = DesignConfig {
            dynamic_row_height: Some(false),
            ..Default::default()
        };
        let mut t = PdfTable::new(
            TableOptions::new(80, 1)
                .with_design(design)
                .with_repeat_header_rows(1),
        );
        t.set_cell(0, 0, "Header").unwrap();
        for row in 1..80 {
            t.set_cell(row, 0, &format!("row {}", row)).unwrap();
        }
        t
    };

    let doc = table.render_to_new_document().unwrap();
    assert!(doc.page_count() >= 2);
    for page in 0..doc.page_count() {
        let texts = page_texts(&doc, page);
        assert_eq!(texts[0], "Header");
        assert_eq!(texts.iter().filter(|t| *t == "Header").count(), 1);
    }
}

// ─── Styles ─────────────────────────────────────────────────────

#[test]
fn test_cell_style_beats_design() {
    let design = DesignConfig {
        base: CellStyle {
            font_size: Some(12.0),
            ..Default::default()
        },
        heading_row_style: Some(CellStyle {
            background_color: Some(ColorInput::hex("#ff0000")),
            ..Default::default()
        }),
        ..Default::default()
    };
    let mut table = PdfTable::new(TableOptions::new(3, 3).with_design(design));
    for row in 0..3 {
        for col in 0..3 {
            table
                .set_cell_style(
                    row,
                    col,
                    CellStyle {
                        font_size: Some(16.0),
                        ..Default::default()
                    },
                )
                .unwrap();
        }
    }

    for row in 0..3 {
        for col in 0..3 {
            let style = table.effective_cell_style(row, col).unwrap();
            assert_eq!(style.font_size, 16.0);
            if row == 0 {
                assert_eq!(style.background_color, Some(Rgb::new(1.0, 0.0, 0.0)));
            }
        }
    }
}

#[test]
fn test_set_cell_style_replaces() {
    let mut table = make_table(2, 2);
    table
        .set_cell_style(
            1,
            1,
            CellStyle {
                font_size: Some(10.0),
                ..Default::default()
            },
        )
        .unwrap();
    let centered = CellStyle {
        alignment: Some(Alignment::Center),
        ..Default::default()
    };
    table.set_cell_style(1, 1, centered.clone()).unwrap();
    assert_eq!(table.get_cell_style(1, 1).unwrap(), &centered);
}

// ─── Mutations ──────────────────────────────────────────────────

#[test]
fn test_row_mutations() {
    let mut table = make_table(2, 3);
    table.add_row();
    assert_eq!(table.row_count(), 3);
    for col in 0..3 {
        assert_eq!(table.get_cell(2, col).unwrap(), "");
    }

    table.remove_row(2).unwrap();
    assert_eq!(table.row_count(), 2);
    assert!(matches!(
        table.get_cell(2, 0),
        Err(TableError::OutOfRange { .. })
    ));
}

#[test]
fn test_out_of_range_access() {
    let mut table = make_table(2, 2);
    assert!(table.set_cell(2, 0, "x").is_err());
    assert!(table.get_cell(0, 2).is_err());
    assert!(table.set_cell_style(5, 5, CellStyle::default()).is_err());
    assert!(matches!(
        table.merge_cells(0, 0, 2, 1),
        Err(TableError::OutOfRange { .. })
    ));
    assert!(matches!(
        table.merge_cells(1, 1, 0, 0),
        Err(TableError::InvalidRange { .. })
    ));
}

// ─── PDF output ─────────────────────────────────────────────────

#[test]
fn test_table_produces_valid_pdf() {
    let bytes = make_fixed_height_table(60, 4).to_pdf_bytes().unwrap();
    assert_valid_pdf(&bytes);
    let text = String::from_utf8_lossy(&bytes);
    assert!(text.contains("/Count 2"));
    assert!(text.contains("/BaseFont /Helvetica"));
}

#[test]
fn test_render_json() {
    let json = r#"{
        "metadata": { "title": "Inventory" },
        "template": "financial",
        "table": { "repeatHeaderRows": 1 },
        "cells": [["Item", "Qty"], ["Bolts", "120"], ["Total", "120"]],
        "merges": []
    }"#;
    let bytes = tabula::render_json(json).unwrap();
    assert_valid_pdf(&bytes);
    assert!(String::from_utf8_lossy(&bytes).contains("/Title (Inventory)"));
}

#[test]
fn test_render_json_reports_parse_errors() {
    let err = tabula::render_json("{ \"cells\": [[\"a\"],] }").unwrap_err();
    assert!(matches!(err, TableError::Parse { .. }));
    assert!(err.to_string().contains("Hint"));
}
