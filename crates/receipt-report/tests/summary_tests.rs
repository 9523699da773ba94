use chrono::NaiveDate;
use receipt_report::*;

fn request(categories: Vec<CategorySummary>) -> ReportRequest {
    ReportRequest {
        requester: "Jelena Nikolic".to_string(),
        approver: "Stefan Ilic".to_string(),
        date: NaiveDate::from_ymd_opt(2025, 11, 2).unwrap(),
        categories,
    }
}

fn texts(request: &ReportRequest, options: &ReportOptions) -> Vec<String> {
    summary_lines(request, options)
        .unwrap()
        .into_iter()
        .map(|line| line.text)
        .collect()
}

#[test]
fn test_summary_layout_order() {
    let req = request(vec![
        CategorySummary::new("Tolls (53940)", "30".parse().unwrap(), Vec::new()),
        CategorySummary::new("Fuel (51300)", "150.5".parse().unwrap(), Vec::new()),
    ]);

    assert_eq!(
        texts(&req, &ReportOptions::default()),
        vec![
            "EXPENSE REIMBURSEMENT REQUEST",
            "Requested by: Jelena Nikolic",
            "Approved by: Stefan Ilic",
            "Request date: 2025-11-02",
            "Totals by category:",
            "Tolls (53940): 30.00 RSD",
            "Fuel (51300): 150.50 RSD",
            "TOTAL: 180.50 RSD",
        ]
    );
}

#[test]
fn test_empty_summary_has_zero_total() {
    let lines = texts(&request(Vec::new()), &ReportOptions::default());
    assert_eq!(lines.len(), 6);
    assert_eq!(lines.last().unwrap(), "TOTAL: 0.00 RSD");
}

#[test]
fn test_grand_total_is_exact_sum() {
    let totals = ["0.10", "0.20", "1234.56", "99.99", "0.05"];
    let req = request(
        totals
            .iter()
            .enumerate()
            .map(|(i, t)| CategorySummary::new(format!("C{}", i), t.parse().unwrap(), Vec::new()))
            .collect(),
    );

    assert_eq!(req.grand_total(), Some(Amount::from_minor(133490)));
    assert_eq!(
        texts(&req, &ReportOptions::default()).last().unwrap(),
        "TOTAL: 1334.90 RSD"
    );
}

#[test]
fn test_title_and_currency_come_from_options() {
    let options = ReportOptions {
        title: "TRAVEL CLAIM".to_string(),
        currency: "EUR".to_string(),
        ..Default::default()
    };
    let req = request(vec![CategorySummary::new(
        "Hotel",
        "80".parse().unwrap(),
        Vec::new(),
    )]);

    let lines = texts(&req, &options);
    assert_eq!(lines[0], "TRAVEL CLAIM");
    assert_eq!(lines[5], "Hotel: 80.00 EUR");
    assert_eq!(lines[6], "TOTAL: 80.00 EUR");
}

#[test]
fn test_lines_move_down_the_page() {
    let req = request(vec![
        CategorySummary::new("A", Amount::ZERO, Vec::new()),
        CategorySummary::new("B", Amount::ZERO, Vec::new()),
    ]);
    let lines = summary_lines(&req, &ReportOptions::default()).unwrap();

    assert!(lines.windows(2).all(|w| w[1].top_pt > w[0].top_pt));
    assert!(lines[0].bold);
    assert!(lines.last().unwrap().bold);
    assert!(!lines[1].bold);
}

#[test]
fn test_summary_page_is_single_a4_page() {
    let categories = (0..60)
        .map(|i| CategorySummary::new(format!("Category {}", i), Amount::from_minor(i), Vec::new()))
        .collect();
    let doc = render_summary_page(&request(categories), &ReportOptions::default()).unwrap();

    // Overflowing category lists still render on exactly one page
    assert_eq!(doc.get_pages().len(), 1);
}

#[test]
fn test_summary_page_text_keeps_serbian_letters() {
    let mut req = request(vec![CategorySummary::new(
        "Ostali troškovi (55900)",
        "1200".parse().unwrap(),
        Vec::new(),
    )]);
    req.requester = "Teodora Golubović".to_string();
    req.approver = "Đorđe Živković".to_string();

    let doc = render_summary_page(&req, &ReportOptions::default()).unwrap();
    let text = doc.extract_text(&[1]).unwrap();

    assert!(text.contains("Golubović"), "extracted: {text:?}");
    assert!(text.contains("Živković"), "extracted: {text:?}");
    assert!(text.contains("Đorđe"), "extracted: {text:?}");
    assert!(text.contains("troškovi"), "extracted: {text:?}");
    assert!(text.contains("1200.00"), "extracted: {text:?}");
}

#[test]
fn test_summary_page_draws_every_line() {
    let req = request(vec![
        CategorySummary::new("Tolls (53940)", "30".parse().unwrap(), Vec::new()),
        CategorySummary::new("Fuel (51300)", "150.5".parse().unwrap(), Vec::new()),
    ]);

    let doc = render_summary_page(&req, &ReportOptions::default()).unwrap();
    let text = doc.extract_text(&[1]).unwrap();

    for needle in ["REIMBURSEMENT", "Nikolic", "Ilic", "2025-11-02", "53940", "51300", "180.50"] {
        assert!(text.contains(needle), "missing {needle:?} in {text:?}");
    }
}

#[test]
fn test_overflowing_grand_total_is_a_config_error() {
    let max: Amount = "92233720368547758.07".parse().unwrap();
    let req = request(vec![
        CategorySummary::new("A", max, Vec::new()),
        CategorySummary::new("B", max, Vec::new()),
    ]);

    assert_eq!(req.grand_total(), None);
    assert!(matches!(
        summary_lines(&req, &ReportOptions::default()),
        Err(ReportError::Config(_))
    ));
    assert!(matches!(
        render_summary_page(&req, &ReportOptions::default()),
        Err(ReportError::Config(_))
    ));
}
