use planbox::{
    build, create_table, Factor, FactorDecl, FactorSet, LogMidpoint, Options, PlanParams,
    Strategy,
};

fn main() {
    let env = env_logger::Env::new().filter_or("PLANBOX_LOG", "info");
    let mut builder = env_logger::Builder::from_env(env);
    let builder = builder.target(env_logger::Target::Stdout);
    builder.try_init().ok();

    let factors = FactorSet::new(vec![
        Factor::linear("temperature", 20., 80., 3).unwrap(),
        Factor::log("concentration", 1e-3, 1e-1, 3).unwrap(),
        Factor::linear("pressure", 1., 5., 3).unwrap(),
    ])
    .unwrap();

    println!("*** full factorial, shuffled");
    let table = create_table(
        &factors,
        PlanParams::new(Strategy::FullFactorial { randomize: true }).seed(Some(42)),
    )
    .unwrap();
    println!("{table}");

    println!("*** Box-Behnken");
    let table = create_table(
        &factors,
        PlanParams::new(Strategy::BoxBehnken { randomize: false }),
    )
    .unwrap();
    println!("{table}");

    println!("*** central composite, legacy log midpoint");
    let table = create_table(
        &factors,
        PlanParams::new(Strategy::CentralComposite { randomize: false })
            .log_midpoint(LogMidpoint::Legacy)
            .center_points((1, 1)),
    )
    .unwrap();
    println!("{table}");

    println!("*** D-optimal subset from declarations");
    let decls: Vec<FactorDecl> = serde_json::from_str(
        r#"[
            {"name": "speed", "kind": "linear", "min": 100, "max": 400, "step_count": 4},
            {"name": "feed", "kind": "log", "min": 0.01, "max": 1, "step_count": 3},
            {"name": "tool", "kind": "categorical", "options": ["carbide", "hss", "ceramic"]}
        ]"#,
    )
    .unwrap();
    let options: Options =
        serde_json::from_str(r#"{"method": "d_optimal", "num_samples": 8}"#).unwrap();
    println!("{}", build(&decls, &options).unwrap());

    println!("*** screening of one-hot encoded categories");
    let categories = FactorSet::from_decls(&decls[2..]).unwrap().one_hot().unwrap();
    let table = create_table(
        &categories,
        PlanParams::new(Strategy::TwoLevelScreening { randomize: false }),
    )
    .unwrap();
    println!("{table}");
}
