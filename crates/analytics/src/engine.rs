use crate::dataset::Table;
use crate::error::AnalyticsError;
use crate::export;
use crate::join::left_join;
use crate::report::{
    DemandTrendRow, ExcessInventoryRow, ForecastAccuracyRow, InventoryTrendRow, OntimeShipmentRow,
    PotentialSalesRow, RunSummary, SalesTrendRow, WeeksOfStockRow,
};
use configuration::InputPaths;
use core_types::{DemandRecord, InventoryRecord, ProductMasterRecord, SalesRecord};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

/// Stands in for a missing customer name wherever demand values are zero-filled.
const FILLED_TEXT: &str = "0";

/// Computes the weekly planning KPIs from the four input tables.
///
/// The tables are loaded once and never mutated; every metric derives a fresh
/// result table from them.
#[derive(Debug, Clone)]
pub struct AnalyticsEngine {
    demand: Table<DemandRecord>,
    inventory: Table<InventoryRecord>,
    product_master: Table<ProductMasterRecord>,
    sales: Table<SalesRecord>,
}

impl AnalyticsEngine {
    pub fn new(
        demand: Table<DemandRecord>,
        inventory: Table<InventoryRecord>,
        product_master: Table<ProductMasterRecord>,
        sales: Table<SalesRecord>,
    ) -> Self {
        Self {
            demand,
            inventory,
            product_master,
            sales,
        }
    }

    /// Reads all four inputs. The first input that cannot be read aborts the load.
    pub fn load(paths: &InputPaths) -> Result<Self, AnalyticsError> {
        let demand = Table::load("demand", &paths.demand)?;
        let inventory = Table::load("inventory", &paths.inventory)?;
        let product_master = Table::load("product_master", &paths.product_master)?;
        let sales = Table::load("sales", &paths.sales)?;

        Ok(Self::new(demand, inventory, product_master, sales))
    }

    pub fn demand(&self) -> &Table<DemandRecord> {
        &self.demand
    }

    pub fn inventory(&self) -> &Table<InventoryRecord> {
        &self.inventory
    }

    pub fn product_master(&self) -> &Table<ProductMasterRecord> {
        &self.product_master
    }

    pub fn sales(&self) -> &Table<SalesRecord> {
        &self.sales
    }

    /// Runs every metric and writes the eight result files into `output_dir`.
    ///
    /// Forecast accuracy is computed before potential sales, which consumes it.
    pub fn save_results(&self, output_dir: &Path) -> Result<RunSummary, AnalyticsError> {
        let (sales_trend, demand_trend, inventory_trend) = self.calculate_kpi_trends();
        let forecast_accuracy = self.calculate_forecast_accuracy();
        let ontime_shipments = self.calculate_ontime_shipments();
        let excess_inventory = self.identify_excess_inventory();
        let avg_weeks_of_stock = self.calculate_average_week_of_stock();
        let potential_sales = self.predict_potential_sales(&forecast_accuracy);

        export::prepare_output_dir(output_dir)?;

        let mut summary = RunSummary::new();
        summary.record(export::write_table(output_dir, &sales_trend)?);
        summary.record(export::write_table(output_dir, &demand_trend)?);
        summary.record(export::write_table(output_dir, &inventory_trend)?);
        summary.record(export::write_table(output_dir, &forecast_accuracy)?);
        summary.record(export::write_table(output_dir, &ontime_shipments)?);
        summary.record(export::write_table(output_dir, &excess_inventory)?);
        summary.record(export::write_table(output_dir, &avg_weeks_of_stock)?);
        summary.record(export::write_table(output_dir, &potential_sales)?);

        Ok(summary)
    }

    /// Checks that each numeric column a metric relies on exists in `table`.
    ///
    /// Cell values were cleaned while the table was read. An absent column only
    /// warns: its values are all missing and degrade like any other missing cell.
    fn clean_numeric_column<R>(&self, table: &Table<R>, columns: &[&str]) {
        for column in columns {
            if !table.has_column(column) {
                tracing::warn!("Column '{}' not found in the {} table", column, table.name());
            }
        }
    }

    /// Sums sales, demand and inventory per fiscal week, ascending by week.
    ///
    /// Missing values count as zero and every value is truncated to an integer
    /// before it is summed.
    pub fn calculate_kpi_trends(
        &self,
    ) -> (Vec<SalesTrendRow>, Vec<DemandTrendRow>, Vec<InventoryTrendRow>) {
        self.clean_numeric_column(&self.sales, &["fiscal_week", "sales_amount", "sales_quantity"]);
        let sales_trend = sum_by_week(
            self.sales.rows(),
            |r| (r.fiscal_week, r.sales_amount, r.sales_quantity),
        )
        .into_iter()
        .map(|(fiscal_week, (sales_amount, sales_quantity))| SalesTrendRow {
            fiscal_week,
            sales_amount,
            sales_quantity,
        })
        .collect();

        self.clean_numeric_column(
            &self.demand,
            &["fiscal_week", "final_demand_amount", "final_demand_quantity"],
        );
        let demand_trend = sum_by_week(
            self.demand.rows(),
            |r| (r.fiscal_week, r.final_demand_amount, r.final_demand_quantity),
        )
        .into_iter()
        .map(|(fiscal_week, (final_demand_amount, final_demand_quantity))| DemandTrendRow {
            fiscal_week,
            final_demand_amount,
            final_demand_quantity,
        })
        .collect();

        self.clean_numeric_column(
            &self.inventory,
            &["fiscal_week", "inventory_amount", "inventory_quantity"],
        );
        let inventory_trend = sum_by_week(
            self.inventory.rows(),
            |r| (r.fiscal_week, r.inventory_amount, r.inventory_quantity),
        )
        .into_iter()
        .map(|(fiscal_week, (inventory_amount, inventory_quantity))| InventoryTrendRow {
            fiscal_week,
            inventory_amount,
            inventory_quantity,
        })
        .collect();

        (sales_trend, demand_trend, inventory_trend)
    }

    /// Forecast accuracy per (customer, week) for the 4-week and 1-week horizons.
    ///
    /// `accuracy = 100 * (1 - |forecast - final| / final)` over summed quantities.
    /// A zero final quantity leaves the accuracy undefined (`None`).
    pub fn calculate_forecast_accuracy(&self) -> Vec<ForecastAccuracyRow> {
        self.clean_numeric_column(
            &self.demand,
            &[
                "final_demand_amount",
                "demand_1_weeks_before_amount",
                "demand_4_weeks_before_amount",
                "final_demand_quantity",
                "demand_1_weeks_before_quantity",
                "demand_4_weeks_before_quantity",
            ],
        );

        // [final, 4 weeks before, 1 week before]
        let mut groups: BTreeMap<(String, i64), [f64; 3]> = BTreeMap::new();
        for row in self.demand.rows() {
            let key = (filled_text(&row.customer_name), as_int(row.fiscal_week));
            let sums = groups.entry(key).or_insert([0.0; 3]);
            sums[0] += as_int(row.final_demand_quantity) as f64;
            sums[1] += zero(row.demand_4_weeks_before_quantity);
            sums[2] += zero(row.demand_1_weeks_before_quantity);
        }

        groups
            .into_iter()
            .map(|((customer_name, fiscal_week), [final_qty, four_weeks, one_week])| {
                ForecastAccuracyRow {
                    fiscal_week,
                    customer_name,
                    forecast_accuracy_4_weeks: accuracy(four_weeks, final_qty),
                    forecast_accuracy_1_week: accuracy(one_week, final_qty),
                }
            })
            .collect()
    }

    /// Mean share of on-time deliveries per (customer, plant).
    ///
    /// Rows without a customer or plant are not grouped. A row with no
    /// deliveries has no on-time share and is left out of the mean.
    pub fn calculate_ontime_shipments(&self) -> Vec<OntimeShipmentRow> {
        self.clean_numeric_column(&self.sales, &["ontime_delivery", "no_of_delivery"]);

        let mut groups: BTreeMap<(String, String), Mean> = BTreeMap::new();
        for row in self.sales.rows() {
            let (Some(customer_name), Some(plant)) = (&row.customer_name, &row.plant) else {
                continue;
            };
            let ontime_average = ratio(zero(row.ontime_delivery), zero(row.no_of_delivery));
            groups
                .entry((customer_name.clone(), plant.clone()))
                .or_default()
                .push(ontime_average);
        }

        groups
            .into_iter()
            .map(|((customer_name, plant), mean)| OntimeShipmentRow {
                customer_name,
                plant,
                ontime_average: mean.value(),
            })
            .collect()
    }

    /// Inventory exceeding future demand at the same region, product, plant,
    /// plant country and week. Only positive excess is reported.
    ///
    /// Inventory amounts and weeks are truncated to integers and a missing week
    /// keys as week 0 on both sides, the same coercion the weekly trends apply.
    pub fn identify_excess_inventory(&self) -> Vec<ExcessInventoryRow> {
        let joined = left_join(
            self.inventory.rows(),
            self.demand.rows(),
            |i| {
                (
                    i.region.as_deref(),
                    i.product.as_deref(),
                    i.plant.as_deref(),
                    i.plant_country.as_deref(),
                    as_int(i.fiscal_week),
                )
            },
            |d| {
                (
                    filled_key(&d.region),
                    filled_key(&d.product),
                    filled_key(&d.plant_code),
                    filled_key(&d.plant_country),
                    as_int(d.fiscal_week),
                )
            },
        );

        self.clean_numeric_column(&self.inventory, &["inventory_amount"]);
        self.clean_numeric_column(&self.demand, &["future_demand_amount"]);

        joined
            .into_iter()
            .filter_map(|(inventory, demand)| {
                let future_demand = demand.map(|d| zero(d.future_demand_amount))?;
                let excess_inventory = as_int(inventory.inventory_amount) as f64 - future_demand;
                (excess_inventory > 0.0).then(|| ExcessInventoryRow {
                    product: inventory.product.clone(),
                    plant: inventory.plant.clone(),
                    excess_inventory,
                })
            })
            .collect()
    }

    /// Average weeks of stock (inventory / future demand) per plant.
    ///
    /// Unlike excess inventory, the join ignores plant country. Zero or unmatched
    /// future demand gives no weeks-of-stock value for that row; a plant with no
    /// value at all reports 0.
    pub fn calculate_average_week_of_stock(&self) -> Vec<WeeksOfStockRow> {
        let joined = left_join(
            self.inventory.rows(),
            self.demand.rows(),
            |i| {
                (
                    i.region.as_deref(),
                    i.product.as_deref(),
                    i.plant.as_deref(),
                    as_int(i.fiscal_week),
                )
            },
            |d| {
                (
                    filled_key(&d.region),
                    filled_key(&d.product),
                    filled_key(&d.plant_code),
                    as_int(d.fiscal_week),
                )
            },
        );

        self.clean_numeric_column(&self.inventory, &["inventory_amount"]);
        self.clean_numeric_column(&self.demand, &["future_demand_amount"]);

        let mut groups: BTreeMap<&str, Mean> = BTreeMap::new();
        for (inventory, demand) in joined {
            let Some(plant) = inventory.plant.as_deref() else {
                continue;
            };
            let weeks_of_stock = demand
                .map(|d| zero(d.future_demand_amount))
                .filter(|future| *future != 0.0)
                .map(|future| as_int(inventory.inventory_amount) as f64 / future);
            groups.entry(plant).or_default().push(weeks_of_stock);
        }

        groups
            .into_iter()
            .map(|(plant, mean)| WeeksOfStockRow {
                plant: plant.to_string(),
                weeks_of_stock: mean.value().unwrap_or(0.0),
            })
            .collect()
    }

    /// Future demand weighted by the 1-week forecast accuracy, per customer.
    ///
    /// Both sides are reduced to the first row seen for each customer before
    /// they are joined. A customer without a defined accuracy sums to 0.
    pub fn predict_potential_sales(
        &self,
        forecast_accuracy: &[ForecastAccuracyRow],
    ) -> Vec<PotentialSalesRow> {
        let mut accuracy_by_customer: HashMap<&str, Option<f64>> = HashMap::new();
        for row in forecast_accuracy {
            accuracy_by_customer
                .entry(row.customer_name.as_str())
                .or_insert(row.forecast_accuracy_1_week);
        }

        let mut seen = HashSet::new();
        let mut totals: BTreeMap<String, f64> = BTreeMap::new();
        for row in self.demand.rows() {
            let customer_name = filled_text(&row.customer_name);
            if !seen.insert(customer_name.clone()) {
                continue;
            }

            let accuracy = accuracy_by_customer
                .get(customer_name.as_str())
                .copied()
                .flatten();
            let total = totals.entry(customer_name).or_insert(0.0);
            if let Some(accuracy) = accuracy {
                *total += zero(row.future_demand_amount) * accuracy;
            }
        }

        totals
            .into_iter()
            .map(|(customer_name, potential_sales)| PotentialSalesRow {
                customer_name,
                potential_sales,
            })
            .collect()
    }
}

/// Running mean that skips undefined values.
#[derive(Debug, Default)]
struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    fn push(&mut self, value: Option<f64>) {
        if let Some(value) = value {
            self.sum += value;
            self.count += 1;
        }
    }

    fn value(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Groups rows by truncated fiscal week and sums two truncated columns per week.
fn sum_by_week<R>(
    rows: &[R],
    columns: impl Fn(&R) -> (Option<f64>, Option<f64>, Option<f64>),
) -> BTreeMap<i64, (i64, i64)> {
    let mut weeks = BTreeMap::new();
    for row in rows {
        let (week, amount, quantity) = columns(row);
        let sums = weeks.entry(as_int(week)).or_insert((0i64, 0i64));
        // Wraps like the int64 columns the totals are published as.
        sums.0 = sums.0.wrapping_add(as_int(amount));
        sums.1 = sums.1.wrapping_add(as_int(quantity));
    }
    weeks
}

fn zero(value: Option<f64>) -> f64 {
    value.unwrap_or(0.0)
}

/// Missing becomes 0; anything else is truncated toward zero.
fn as_int(value: Option<f64>) -> i64 {
    zero(value) as i64
}

/// Join key for a demand text column. Demand cells are zero-filled, so a
/// missing value keys as `"0"` and never matches a missing inventory value.
fn filled_key(value: &Option<String>) -> Option<&str> {
    Some(value.as_deref().unwrap_or(FILLED_TEXT))
}

fn filled_text(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| FILLED_TEXT.to_string())
}

fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    (denominator != 0.0).then(|| numerator / denominator)
}

fn accuracy(forecast: f64, actual: f64) -> Option<f64> {
    ratio((forecast - actual).abs(), actual).map(|error| 100.0 * (1.0 - error))
}
