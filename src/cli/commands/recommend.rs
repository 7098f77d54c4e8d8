//! `recommend` - runs the reorder policy over an inventory snapshot and, when a
//! template is given, writes the resulting order document.

use crate::{
    cli::{AppContext, RecommendArgs},
    core::{
        recommend,
        reconcile::{self, ExactMatcher, NameMatcher, ReconcileOutcome, SubstringMatcher},
        report,
    },
    errors::Result,
    ingest::{inventory, template},
};
use chrono::NaiveDate;
use std::fmt::Write;
use tracing::warn;

/// Runs a recommendation for `args`; `today` dates the generated order document.
pub async fn handle(ctx: &AppContext, args: &RecommendArgs, today: NaiveDate) -> Result<String> {
    let policy = ctx.config.policy.to_policy()?;
    let rows = inventory::read_snapshot(&args.inventory)?;

    let run = recommend::run_for_snapshot(&ctx.database, &rows, &policy).await?;

    let mut out = report::format_recommendation_table(&run.recommendations);
    for (code, reason) in &run.skipped {
        let _ = writeln!(out, "Skipped {code}: {reason}");
    }
    let _ = writeln!(out, "{}", report::format_run_summary(&run));

    let (Some(template_dir), Some(output_root)) = (&args.template, &args.output) else {
        return Ok(out);
    };

    let layout = ctx.config.template.to_layout()?;
    let document = template::load_template(template_dir)?;
    let matcher: &dyn NameMatcher = if args.exact_match {
        &ExactMatcher
    } else {
        &SubstringMatcher
    };

    match reconcile::reconcile(&run.recommendations, document, &layout, matcher)? {
        ReconcileOutcome::Filled { template: filled, matched } => {
            let target = output_root.join(template::default_output_name(layout.sheet(), today));
            template::save_template(&filled, &target)?;
            let _ = writeln!(
                out,
                "Order written to {} ({matched} rows filled)",
                target.display()
            );
        }
        ReconcileOutcome::NoMatches { .. } => {
            warn!("Order template left untouched: no product names matched");
            let _ = writeln!(out, "No template rows matched; no order written");
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{config::settings::AppConfig, errors::Error, test_utils::*};
    use std::{fs, path::Path};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 7).unwrap()
    }

    async fn seeded_context() -> Result<AppContext> {
        let db = setup_test_db().await?;
        create_test_product(&db, "FB063", "DXN Zhi Café Classic", 12).await?;
        record_test_sale(&db, "FB063", 12, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()).await?;
        record_test_sale(&db, "FB063", 8, NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()).await?;
        Ok(AppContext::new(db, AppConfig::default()))
    }

    fn write_inventory(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("inventario.csv");
        fs::write(
            &path,
            "code,name,quantity\nFB063,DXN Zhi Café Classic,40\nFB999,Unknown,3\n",
        )
        .unwrap();
        path
    }

    fn write_template(dir: &Path, product: &str) -> std::path::PathBuf {
        let template = dir.join("plantilla");
        fs::create_dir(&template).unwrap();
        fs::write(
            template.join("Arequipa.csv"),
            format!("ORDER\n,\n#,Product,,,,,,Boxes\n1,{product}\n"),
        )
        .unwrap();
        template
    }

    #[tokio::test]
    async fn test_recommend_without_template() -> Result<()> {
        let ctx = seeded_context().await?;
        let dir = tempfile::tempdir()?;
        let args = RecommendArgs {
            inventory: write_inventory(dir.path()),
            template: None,
            output: None,
            exact_match: false,
        };

        let out = handle(&ctx, &args, today()).await?;
        assert!(out.contains("DXN Zhi Café Classic"));
        assert!(out.contains("Skipped FB999: not in catalog"));
        assert!(out.ends_with("1 products evaluated, 1 to order (5 boxes), 1 skipped\n"));
        Ok(())
    }

    #[tokio::test]
    async fn test_recommend_fills_template() -> Result<()> {
        let ctx = seeded_context().await?;
        let dir = tempfile::tempdir()?;
        let output = dir.path().join("out");
        let args = RecommendArgs {
            inventory: write_inventory(dir.path()),
            template: Some(write_template(dir.path(), "DXN Zhi Café Classic 180g")),
            output: Some(output.clone()),
            exact_match: false,
        };

        let out = handle(&ctx, &args, today()).await?;
        assert!(out.contains("1 rows filled"));

        let written = template::load_template(&output.join("Orden_Pedido_Arequipa2024-03-07"))?;
        let sheet = written.sheet("Arequipa").unwrap();
        assert_eq!(sheet.cell(3, 7), Some("5"));
        Ok(())
    }

    #[tokio::test]
    async fn test_exact_match_writes_nothing_when_names_differ() -> Result<()> {
        let ctx = seeded_context().await?;
        let dir = tempfile::tempdir()?;
        let output = dir.path().join("out");
        let args = RecommendArgs {
            inventory: write_inventory(dir.path()),
            template: Some(write_template(dir.path(), "DXN Zhi Café Classic 180g")),
            output: Some(output.clone()),
            exact_match: true,
        };

        let out = handle(&ctx, &args, today()).await?;
        assert!(out.contains("no order written"));
        assert!(!output.exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_template_sheet_is_fatal() -> Result<()> {
        let ctx = seeded_context().await?;
        let dir = tempfile::tempdir()?;
        let template_dir = dir.path().join("plantilla");
        fs::create_dir(&template_dir)?;
        fs::write(template_dir.join("Cusco.csv"), "Product\n")?;

        let args = RecommendArgs {
            inventory: write_inventory(dir.path()),
            template: Some(template_dir),
            output: Some(dir.path().join("out")),
            exact_match: false,
        };

        let result = handle(&ctx, &args, today()).await;
        assert!(matches!(result, Err(Error::TemplateSheetMissing { .. })));
        Ok(())
    }
}
