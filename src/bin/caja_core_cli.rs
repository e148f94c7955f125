use std::{env, path::PathBuf, process};

use chrono::Utc;
use colored::Colorize;

use caja_core::{
    catalog::{Catalog, CatalogKind, CategoryService},
    category::{Code, TreeIndex},
    init,
    ledger::{compute_balances, prune_zero, BalanceTree},
    storage::CatalogStore,
    sync::{synchronize_all, synchronize_mirror},
    utils::persistence,
};

fn main() {
    init();

    if let Err(err) = run() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);
    let command = args.next().unwrap_or_else(|| {
        print_usage();
        process::exit(1);
    });

    match command.as_str() {
        "new" => {
            let name = next_arg(&mut args);
            let kind = match next_arg(&mut args).as_str() {
                "income" => CatalogKind::Income,
                "expense" => CatalogKind::Expense,
                other => {
                    eprintln!("Unknown catalog kind `{other}` (income|expense)");
                    process::exit(1);
                }
            };
            let catalog = Catalog::new(name, kind);
            println!("{}", serde_json::to_string_pretty(&catalog)?);
        }
        "add" => {
            let path = next_path(&mut args);
            let name = next_arg(&mut args);
            let mut parent: Option<Code> = None;
            let mut is_list = false;
            for arg in args.by_ref() {
                if arg == "--list" {
                    is_list = true;
                } else {
                    parent = Some(arg.parse()?);
                }
            }
            let store = CatalogStore::new(persistence::load_catalog_from_file(&path)?);
            let (node, report) =
                CategoryService::add_category(&store, &name, parent.as_ref(), is_list)?;
            persistence::save_catalog_to_file(&store.into_inner(), &path)?;
            println!(
                "Created {} {} ({} mirrored, {} skipped)",
                node.code.to_string().bold(),
                node.name,
                report.created.len(),
                report.skipped.len()
            );
        }
        "items" => {
            let path = next_path(&mut args);
            let list_code: Code = next_arg(&mut args).parse()?;
            let items: Vec<String> = args.collect();
            if items.is_empty() {
                print_usage();
                process::exit(1);
            }
            let store = CatalogStore::new(persistence::load_catalog_from_file(&path)?);
            let (created, report) = CategoryService::attach_items(&store, &list_code, &items)?;
            persistence::save_catalog_to_file(&store.into_inner(), &path)?;
            println!(
                "Added {} item(s), {} mirrored",
                created.len(),
                report.created.len()
            );
        }
        "record" => {
            let path = next_path(&mut args);
            let code: Code = next_arg(&mut args).parse()?;
            let amount: f64 = next_arg(&mut args).parse()?;
            let mut catalog = persistence::load_catalog_from_file(&path)?;
            let id = catalog.record_transaction(&code, amount, Utc::now())?;
            persistence::save_catalog_to_file(&catalog, &path)?;
            println!("Recorded transaction {id}");
        }
        "sync" => {
            let path = next_path(&mut args);
            let code: Code = next_arg(&mut args).parse()?;
            let store = CatalogStore::new(persistence::load_catalog_from_file(&path)?);
            let report = synchronize_mirror(&store, &code)?;
            persistence::save_catalog_to_file(&store.into_inner(), &path)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        "sync-all" => {
            let path = next_path(&mut args);
            let store = CatalogStore::new(persistence::load_catalog_from_file(&path)?);
            let report = synchronize_all(&store)?;
            persistence::save_catalog_to_file(&store.into_inner(), &path)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        "tree" => {
            let catalog = persistence::load_catalog_from_file(&next_path(&mut args))?;
            let index = catalog.index();
            for root in index.roots() {
                print_subtree(&index, &root.code, 0);
            }
        }
        "balances" => {
            let path = next_path(&mut args);
            let pruned = args.any(|arg| arg == "--pruned");
            let catalog = persistence::load_catalog_from_file(&path)?;
            let tree = compute_balances(&catalog.transactions);
            let tree = if pruned { prune_zero(&tree) } else { tree };
            print_balances(&tree, 0);
        }
        _ => {
            print_usage();
            process::exit(1);
        }
    }

    Ok(())
}

fn next_arg(args: &mut impl Iterator<Item = String>) -> String {
    args.next().unwrap_or_else(|| {
        print_usage();
        process::exit(1);
    })
}

fn next_path(args: &mut impl Iterator<Item = String>) -> PathBuf {
    PathBuf::from(next_arg(args))
}

fn print_subtree(index: &TreeIndex, code: &Code, depth: usize) {
    if let Some(node) = index.get(code) {
        let indent = "  ".repeat(depth);
        let label = if node.active {
            node.name.normal()
        } else {
            node.name.dimmed()
        };
        let marker = if node.is_list { " [lista]" } else { "" };
        println!("{indent}{} {label}{marker}", node.code.to_string().cyan());
        for child in index.children_of(code) {
            print_subtree(index, &child.code, depth + 1);
        }
    }
}

fn print_balances(tree: &BalanceTree, depth: usize) {
    let indent = "  ".repeat(depth);
    for (name, node) in tree {
        let amount = format!("{:.2}", node.saldo);
        let amount = if node.saldo < 0.0 {
            amount.red()
        } else {
            amount.green()
        };
        println!("{indent}{name}: {amount}");
        print_balances(&node.subcategorias, depth + 1);
    }
}

fn print_usage() {
    eprintln!(
        "Usage: caja_core_cli <command>\n\
         Commands:\n  \
         new <name> <income|expense>\n  \
         add <file.json> <name> [parent-code] [--list]\n  \
         items <file.json> <list-code> <item>...\n  \
         record <file.json> <code> <amount>\n  \
         sync <file.json> <code>\n  \
         sync-all <file.json>\n  \
         tree <file.json>\n  \
         balances <file.json> [--pruned]"
    );
}
