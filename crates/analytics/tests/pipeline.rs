use analytics::{AnalyticsEngine, AnalyticsError};
use configuration::InputPaths;
use std::fs;
use std::path::Path;

const DEMAND: &str = "\
customer_name,region,product,plant_code,plant_country,fiscal_week,final_demand_amount,final_demand_quantity,demand_1_weeks_before_amount,demand_1_weeks_before_quantity,demand_4_weeks_before_amount,demand_4_weeks_before_quantity,future_demand_amount
Acme,EU,Widget,P1,DE,1,\"1,000\",100,900,90,800,80,30
Acme,EU,Widget,P1,DE,2,500,50,500,50,500,40,0
Beta,EU,Gadget,P2,FR,1,200,20,200,10,200,20,10
";

const INVENTORY: &str = "\
region,product,plant,plant_country,fiscal_week,inventory_amount,inventory_quantity
EU,Widget,P1,DE,1,50,5
EU,Widget,P1,DE,2,\"1,200\",12
EU,Gadget,P2,FR,1,5,1
EU,Bolt,P3,IT,1,40,4
";

const PRODUCT_MASTER: &str = "\
product,family
Widget,Hardware
Gadget,Hardware
";

const SALES: &str = "\
customer_name,plant,fiscal_week,sales_amount,sales_quantity,ontime_delivery,no_of_delivery
Acme,P1,1,10,1,1,2
Acme,P1,1,5,2,3,3
Beta,P2,2,7,1,oops,4
";

fn write_inputs(dir: &Path) -> InputPaths {
    let paths = InputPaths {
        demand: dir.join("demand.csv"),
        inventory: dir.join("inventory.csv"),
        product_master: dir.join("product_master.csv"),
        sales: dir.join("sales.csv"),
    };
    fs::write(&paths.demand, DEMAND).unwrap();
    fs::write(&paths.inventory, INVENTORY).unwrap();
    fs::write(&paths.product_master, PRODUCT_MASTER).unwrap();
    fs::write(&paths.sales, SALES).unwrap();
    paths
}

fn read_output(dir: &Path, file_name: &str) -> Vec<Vec<String>> {
    fs::read_to_string(dir.join(file_name))
        .unwrap()
        .lines()
        .map(|line| line.split('\u{1d}').map(str::to_string).collect())
        .collect()
}

#[test]
fn full_run_writes_every_result_file() {
    let input_dir = tempfile::tempdir().unwrap();
    let output_dir = tempfile::tempdir().unwrap();
    let out = output_dir.path().join("results");

    let engine = AnalyticsEngine::load(&write_inputs(input_dir.path())).unwrap();
    let summary = engine.save_results(&out).unwrap();

    let names: Vec<&str> = summary.files.iter().map(|f| f.file_name).collect();
    assert_eq!(
        names,
        vec![
            "sales_trend.csv",
            "demand_trend.csv",
            "inventory_trend.csv",
            "forecast_accuracy.csv",
            "ontime_shipments.csv",
            "excess_inventory.csv",
            "avg_weeks_of_stock.csv",
            "potential_sales.csv",
        ]
    );
    assert!(summary.files.iter().all(|f| f.path.is_file()));
    assert_eq!(engine.product_master().len(), 2);

    assert_eq!(
        read_output(&out, "sales_trend.csv"),
        vec![
            vec!["fiscal_week", "sales_amount", "sales_quantity"],
            vec!["1", "15", "3"],
            vec!["2", "7", "1"],
        ]
    );

    assert_eq!(
        read_output(&out, "inventory_trend.csv")[1],
        vec!["1", "95", "10"]
    );

    let forecast = read_output(&out, "forecast_accuracy.csv");
    assert_eq!(
        forecast[0],
        vec!["fiscal_week", "customer_name", "forecast_accuracy_4_weeks", "forecast_accuracy_1_week"]
    );
    assert_eq!(forecast[1], vec!["1", "Acme", "80.0", "90.0"]);

    let ontime = read_output(&out, "ontime_shipments.csv");
    assert_eq!(ontime[1], vec!["Acme", "P1", "0.75"]);
    assert_eq!(ontime[2], vec!["Beta", "P2", "0.0"]);

    assert_eq!(
        read_output(&out, "excess_inventory.csv"),
        vec![
            vec!["product", "plant", "excess_inventory"],
            vec!["Widget", "P1", "20.0"],
            vec!["Widget", "P1", "1200.0"],
        ]
    );

    assert_eq!(
        read_output(&out, "avg_weeks_of_stock.csv"),
        vec![
            vec!["plant", "weeks_of_stock"],
            vec!["P1", "1.6666666666666667"],
            vec!["P2", "0.5"],
            vec!["P3", "0.0"],
        ]
    );

    let potential = read_output(&out, "potential_sales.csv");
    assert_eq!(potential[1], vec!["Acme", "2700.0"]);
    assert_eq!(potential[2], vec!["Beta", "500.0"]);
}

#[test]
fn repeated_runs_are_identical() {
    let input_dir = tempfile::tempdir().unwrap();
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();

    let engine = AnalyticsEngine::load(&write_inputs(input_dir.path())).unwrap();
    let summary = engine.save_results(first.path()).unwrap();
    engine.save_results(second.path()).unwrap();

    for file in &summary.files {
        let a = fs::read(first.path().join(file.file_name)).unwrap();
        let b = fs::read(second.path().join(file.file_name)).unwrap();
        assert_eq!(a, b, "{} differs between runs", file.file_name);
    }
}

#[test]
fn missing_input_aborts_the_load() {
    let input_dir = tempfile::tempdir().unwrap();
    let mut paths = write_inputs(input_dir.path());
    paths.sales = input_dir.path().join("absent.csv");

    let err = AnalyticsEngine::load(&paths).unwrap_err();

    assert!(matches!(err, AnalyticsError::InputUnavailable { .. }));
}

#[test]
fn malformed_input_aborts_the_load() {
    let input_dir = tempfile::tempdir().unwrap();
    let paths = write_inputs(input_dir.path());
    fs::write(&paths.inventory, "region,product\nEU,Widget,surplus\n").unwrap();

    let err = AnalyticsEngine::load(&paths).unwrap_err();

    assert!(matches!(err, AnalyticsError::MalformedInput { .. }));
}
