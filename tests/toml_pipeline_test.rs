use anyhow::Result;
use price_list_etl::core::Pipeline;
use price_list_etl::utils::validation::Validate;
use price_list_etl::{EtlEngine, LocalStorage, PriceListPipeline, RunIssue, TomlConfig};
use tempfile::TempDir;

/// 用 TOML 設定覆寫加成表與匯率
#[tokio::test]
async fn test_toml_config_overrides_pricing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let temp_path = temp_dir.path().to_str().unwrap().replace('\\', "/");

    tokio::fs::write(
        format!("{}/leverandor.csv", temp_path),
        "Item;ArticleDescription;KostprisEUR;PriceUnit;PriceGroup\n\
         X1;Black chair;10 €;3;21\n\
         X2;Desk;10 €;1;22\n",
    )
    .await?;

    let config_content = format!(
        r#"
[pipeline]
name = "override-test"

[input]
files = ["{dir}/leverandor.csv"]

[pricing]
exchange_rate = 100
currency = "EUR"
default_markup = 0.10

[pricing.markups]
"21" = 0.25

[output]
path = "{dir}/result/prices.csv"
"#,
        dir = temp_path
    );
    let config_path = format!("{}/price-list.toml", temp_path);
    tokio::fs::write(&config_path, config_content).await?;

    let config = TomlConfig::from_file(&config_path)?;
    config.validate()?;

    let engine = EtlEngine::new(PriceListPipeline::new(
        LocalStorage::new(".".to_string()),
        config,
    ));
    let summary = engine.run().await?;

    // group 22 is no longer in the table, so it falls back to 10%
    assert_eq!(summary.records_written, 2);
    assert!(matches!(
        &summary.issues[..],
        [RunIssue::DefaultMarkupApplied { item_code, price_group: 22, .. }] if item_code == "X2"
    ));

    let output = tokio::fs::read_to_string(format!("{}/result/prices.csv", temp_path)).await?;
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines[1], "X1;Sort chair;12.50 EUR;37.50 EUR");
    assert_eq!(lines[2], "X2;Desk;11.00 EUR;11.00 EUR");

    Ok(())
}

#[tokio::test]
async fn test_toml_skip_file_policy() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let temp_path = temp_dir.path().to_str().unwrap().replace('\\', "/");

    tokio::fs::write(
        format!("{}/a.csv", temp_path),
        "Item;KostprisEUR;PriceUnit;PriceGroup\nA1;1 €;1;21\nA2;x €;1;21\n",
    )
    .await?;
    tokio::fs::write(
        format!("{}/b.csv", temp_path),
        "Item;KostprisEUR;PriceUnit;PriceGroup\nB1;1 €;1;21\n",
    )
    .await?;

    let config = TomlConfig::from_toml_str(&format!(
        r#"
[input]
files = ["{dir}/a.csv", "{dir}/b.csv"]
on_record_error = "skip_file"

[output]
path = "{dir}/out.csv"
"#,
        dir = temp_path
    ))?;

    let pipeline = PriceListPipeline::new(LocalStorage::new(".".to_string()), config);
    let extracted = pipeline.extract().await?;
    let result = pipeline.transform(extracted).await?;

    assert_eq!(result.records.len(), 1);
    assert_eq!(result.records[0].item_code, "B1");
    assert!(matches!(
        &result.issues[..],
        [RunIssue::SourceAborted { line: 2, .. }]
    ));

    Ok(())
}
