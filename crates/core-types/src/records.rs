use serde::Deserialize;
use std::collections::BTreeMap;

/// One row of the sales extract.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SalesRecord {
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub plant: Option<String>,
    #[serde(default, deserialize_with = "crate::numeric::lenient")]
    pub fiscal_week: Option<f64>,
    #[serde(default, deserialize_with = "crate::numeric::lenient")]
    pub sales_amount: Option<f64>,
    #[serde(default, deserialize_with = "crate::numeric::lenient")]
    pub sales_quantity: Option<f64>,
    /// Number of deliveries that arrived on time.
    #[serde(default, deserialize_with = "crate::numeric::lenient")]
    pub ontime_delivery: Option<f64>,
    #[serde(default, deserialize_with = "crate::numeric::lenient")]
    pub no_of_delivery: Option<f64>,
}

/// One row of the demand plan.
///
/// `demand_N_weeks_before_*` hold the forecast that was on record N weeks
/// ahead of `fiscal_week`; `final_demand_*` hold what was finally demanded.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DemandRecord {
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub plant_code: Option<String>,
    #[serde(default)]
    pub plant_country: Option<String>,
    #[serde(default, deserialize_with = "crate::numeric::lenient")]
    pub fiscal_week: Option<f64>,
    #[serde(default, deserialize_with = "crate::numeric::lenient")]
    pub final_demand_amount: Option<f64>,
    #[serde(default, deserialize_with = "crate::numeric::lenient")]
    pub final_demand_quantity: Option<f64>,
    #[serde(default, deserialize_with = "crate::numeric::lenient")]
    pub demand_1_weeks_before_amount: Option<f64>,
    #[serde(default, deserialize_with = "crate::numeric::lenient")]
    pub demand_1_weeks_before_quantity: Option<f64>,
    #[serde(default, deserialize_with = "crate::numeric::lenient")]
    pub demand_4_weeks_before_amount: Option<f64>,
    #[serde(default, deserialize_with = "crate::numeric::lenient")]
    pub demand_4_weeks_before_quantity: Option<f64>,
    #[serde(default, deserialize_with = "crate::numeric::lenient")]
    pub future_demand_amount: Option<f64>,
}

/// One row of the inventory snapshot.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InventoryRecord {
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub plant: Option<String>,
    #[serde(default)]
    pub plant_country: Option<String>,
    #[serde(default, deserialize_with = "crate::numeric::lenient")]
    pub fiscal_week: Option<f64>,
    #[serde(default, deserialize_with = "crate::numeric::lenient")]
    pub inventory_amount: Option<f64>,
    #[serde(default, deserialize_with = "crate::numeric::lenient")]
    pub inventory_quantity: Option<f64>,
}

/// A product master row. The schema is owned upstream, so the row is kept as
/// a column name to raw value map.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct ProductMasterRecord {
    pub fields: BTreeMap<String, String>,
}

impl ProductMasterRecord {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read<T: serde::de::DeserializeOwned>(data: &str) -> Vec<T> {
        csv::Reader::from_reader(data.as_bytes())
            .deserialize()
            .collect::<Result<Vec<T>, _>>()
            .unwrap()
    }

    #[test]
    fn sales_cells_are_cleaned_on_read() {
        let rows: Vec<SalesRecord> = read(
            "customer_name,plant,fiscal_week,sales_amount,sales_quantity,ontime_delivery,no_of_delivery\n\
             Acme,P1,12,\"1,500\",3,n/a,\n",
        );

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].customer_name.as_deref(), Some("Acme"));
        assert_eq!(rows[0].fiscal_week, Some(12.0));
        assert_eq!(rows[0].sales_amount, Some(1500.0));
        assert_eq!(rows[0].ontime_delivery, None);
        assert_eq!(rows[0].no_of_delivery, None);
    }

    #[test]
    fn absent_columns_default_to_missing() {
        let rows: Vec<InventoryRecord> = read("plant,fiscal_week\nP1,3\n");

        assert_eq!(rows[0].plant.as_deref(), Some("P1"));
        assert_eq!(rows[0].region, None);
        assert_eq!(rows[0].inventory_amount, None);
    }

    #[test]
    fn empty_text_cell_is_missing() {
        let rows: Vec<DemandRecord> = read("customer_name,region,future_demand_amount\n,EU,10\n");

        assert_eq!(rows[0].customer_name, None);
        assert_eq!(rows[0].region.as_deref(), Some("EU"));
        assert_eq!(rows[0].future_demand_amount, Some(10.0));
    }

    #[test]
    fn product_master_keeps_every_column() {
        let rows: Vec<ProductMasterRecord> = read("product,family,uom\nWidget,Hardware,EA\n");

        assert_eq!(rows[0].get("family"), Some("Hardware"));
        assert_eq!(rows[0].fields.len(), 3);
    }
}
