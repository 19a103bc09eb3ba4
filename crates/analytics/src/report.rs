use serde::Serialize;
use std::path::PathBuf;

/// A row of one of the result files.
///
/// The header is spelled out rather than taken from the first serialized row,
/// so an empty result still produces a file with a header.
pub trait ResultRow: Serialize {
    const FILE_NAME: &'static str;
    const HEADERS: &'static [&'static str];
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesTrendRow {
    pub fiscal_week: i64,
    pub sales_amount: i64,
    pub sales_quantity: i64,
}

impl ResultRow for SalesTrendRow {
    const FILE_NAME: &'static str = "sales_trend.csv";
    const HEADERS: &'static [&'static str] = &["fiscal_week", "sales_amount", "sales_quantity"];
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemandTrendRow {
    pub fiscal_week: i64,
    pub final_demand_amount: i64,
    pub final_demand_quantity: i64,
}

impl ResultRow for DemandTrendRow {
    const FILE_NAME: &'static str = "demand_trend.csv";
    const HEADERS: &'static [&'static str] =
        &["fiscal_week", "final_demand_amount", "final_demand_quantity"];
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryTrendRow {
    pub fiscal_week: i64,
    pub inventory_amount: i64,
    pub inventory_quantity: i64,
}

impl ResultRow for InventoryTrendRow {
    const FILE_NAME: &'static str = "inventory_trend.csv";
    const HEADERS: &'static [&'static str] =
        &["fiscal_week", "inventory_amount", "inventory_quantity"];
}

/// Forecast accuracy per customer and week, in percent.
///
/// `None` where the final demand quantity was zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastAccuracyRow {
    pub fiscal_week: i64,
    pub customer_name: String,
    pub forecast_accuracy_4_weeks: Option<f64>,
    pub forecast_accuracy_1_week: Option<f64>,
}

impl ResultRow for ForecastAccuracyRow {
    const FILE_NAME: &'static str = "forecast_accuracy.csv";
    const HEADERS: &'static [&'static str] = &[
        "fiscal_week",
        "customer_name",
        "forecast_accuracy_4_weeks",
        "forecast_accuracy_1_week",
    ];
}

/// Mean on-time share per (customer, plant).
///
/// `ontime_average` is `None` when no row of the group had any deliveries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OntimeShipmentRow {
    pub customer_name: String,
    pub plant: String,
    pub ontime_average: Option<f64>,
}

impl ResultRow for OntimeShipmentRow {
    const FILE_NAME: &'static str = "ontime_shipments.csv";
    const HEADERS: &'static [&'static str] = &["customer_name", "plant", "ontime_average"];
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExcessInventoryRow {
    pub product: Option<String>,
    pub plant: Option<String>,
    pub excess_inventory: f64,
}

impl ResultRow for ExcessInventoryRow {
    const FILE_NAME: &'static str = "excess_inventory.csv";
    const HEADERS: &'static [&'static str] = &["product", "plant", "excess_inventory"];
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeksOfStockRow {
    pub plant: String,
    pub weeks_of_stock: f64,
}

impl ResultRow for WeeksOfStockRow {
    const FILE_NAME: &'static str = "avg_weeks_of_stock.csv";
    const HEADERS: &'static [&'static str] = &["plant", "weeks_of_stock"];
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PotentialSalesRow {
    pub customer_name: String,
    pub potential_sales: f64,
}

impl ResultRow for PotentialSalesRow {
    const FILE_NAME: &'static str = "potential_sales.csv";
    const HEADERS: &'static [&'static str] = &["customer_name", "potential_sales"];
}

/// A result file that was written to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct WrittenFile {
    pub file_name: &'static str,
    pub path: PathBuf,
    pub rows: usize,
}

/// What a full pipeline run produced, in the order the files were written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub files: Vec<WrittenFile>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, file: WrittenFile) {
        self.files.push(file);
    }

    pub fn total_rows(&self) -> usize {
        self.files.iter().map(|f| f.rows).sum()
    }
}
