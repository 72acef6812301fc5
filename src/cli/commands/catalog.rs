//! `mrt catalog` command - typical hazards and risk reduction methods

use clap::Subcommand;
use console::style;
use miette::Result;
use serde::Serialize;

use crate::cli::output::{effective_format, is_structured, print_structured};
use crate::cli::table::Listing;
use crate::cli::GlobalOpts;
use crate::core::catalog::{infer_category, templates, CategoryView, HazardCategory};
use crate::core::methods::HIERARCHY;

#[derive(Subcommand, Debug)]
pub enum CatalogCommands {
    /// List hazard categories
    Categories,

    /// List typical hazards
    List {
        /// Category, or "all"
        #[arg(default_value = "all")]
        category: CategoryView,
    },

    /// Show the category a hazard name would be filed under
    Infer { name: String },

    /// Show the hierarchy of risk reduction methods
    Methods,
}

#[derive(Serialize)]
struct CategoryRow {
    category: &'static str,
    hazards: usize,
}

#[derive(Serialize)]
struct CatalogRow {
    category: &'static str,
    hazard: &'static str,
    typical_cause: &'static str,
}

#[derive(Serialize)]
struct MethodRow {
    code: &'static str,
    name: &'static str,
    methods: Vec<(&'static str, &'static str)>,
}

pub fn run(cmd: CatalogCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        CatalogCommands::Categories => {
            let records: Vec<CategoryRow> = HazardCategory::ALL
                .iter()
                .map(|c| CategoryRow {
                    category: c.label(),
                    hazards: templates(*c).len(),
                })
                .collect();
            let rows = records
                .iter()
                .map(|r| vec![r.category.to_string(), r.hazards.to_string()])
                .collect();
            Listing {
                headers: &["CATEGORY", "HAZARDS"],
                rows,
                records: &records,
                empty_text: "",
            }
            .print(effective_format(global.output, true))
        }
        CatalogCommands::List { category } => {
            let categories: Vec<HazardCategory> = match category {
                CategoryView::All => HazardCategory::ALL.to_vec(),
                CategoryView::Category(c) => vec![c],
            };
            let records: Vec<CatalogRow> = categories
                .iter()
                .flat_map(|c| {
                    templates(*c).iter().map(move |t| CatalogRow {
                        category: c.label(),
                        hazard: t.name,
                        typical_cause: t.typical_cause,
                    })
                })
                .collect();
            let rows = records
                .iter()
                .map(|r| {
                    vec![
                        r.category.to_string(),
                        r.hazard.to_string(),
                        r.typical_cause.to_string(),
                    ]
                })
                .collect();
            Listing {
                headers: &["CATEGORY", "HAZARD", "TYPICAL CAUSE"],
                rows,
                records: &records,
                empty_text: "No catalog hazards.",
            }
            .print(effective_format(global.output, true))
        }
        CatalogCommands::Infer { name } => {
            let category = infer_category(&name);
            if is_structured(global.output) {
                let output = serde_json::json!({ "hazard": name, "category": category });
                print_structured(global.output, &output)
            } else {
                println!("{}", category.label());
                Ok(())
            }
        }
        CatalogCommands::Methods => {
            if is_structured(global.output) {
                let groups: Vec<MethodRow> = HIERARCHY
                    .iter()
                    .map(|g| MethodRow {
                        code: g.code,
                        name: g.name,
                        methods: g.methods.to_vec(),
                    })
                    .collect();
                return print_structured(global.output, &groups);
            }
            for group in HIERARCHY {
                println!("{}", style(group.label()).bold());
                for (code, name) in group.methods {
                    println!("  {:<5} {}", code, name);
                }
            }
            println!("\nUse codes with `mrt risk set ITEM --method 3.2`");
            Ok(())
        }
    }
}
