//! # StockDesk CLI
//!
//! Terminal front end for the StockDesk dashboard commands.
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging to stderr)
//! 2. Load client configuration (file + environment)
//! 3. Build application state
//! 4. Restore the persisted session
//! 5. Run the requested command
//!
//! ## Examples
//! ```text
//! stockdesk login --email kasir@toko.id
//! stockdesk access /dashboard
//! stockdesk sell --name Budi --phone 08123 --line 11:1 --line 12:2@4
//! stockdesk receipt 42
//! stockdesk merchants 3
//! stockdesk assign-role 7 operator
//! ```

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use secrecy::SecretString;
use serde::Serialize;
use std::path::PathBuf;
use std::str::FromStr;
use stockdesk_client::ClientConfig;
use stockdesk_console_lib::commands::{
    auth, catalog, merchant, navigation, transaction, user, warehouse, wizard,
};
use stockdesk_console_lib::state::ConfigState;
use stockdesk_console_lib::{init_tracing, AppState};
use stockdesk_core::{CustomerForm, Merchant, Product, Receipt, Transaction};

#[derive(Debug, Parser)]
#[command(name = "stockdesk", version, about = "StockDesk dashboard from the terminal")]
struct Cli {
    /// Config file (defaults to stockdesk.toml in the platform config dir)
    #[arg(long, global = true, env = "STOCKDESK_CONFIG")]
    config: Option<PathBuf>,

    /// Print command results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sign in and store the session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "STOCKDESK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out and forget the stored token
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Check whether the current user may open a page
    Access { path: String },
    /// Show the sidebar menu for the current user
    Menu,
    /// List products held by your merchant
    Products,
    /// List your merchant's transactions
    Transactions {
        /// Every merchant's transactions (admin)
        #[arg(long)]
        all: bool,
    },
    /// Show your merchant and its stock
    MyMerchant,
    /// List product categories (admin)
    Categories,
    /// List the whole product catalogue (admin)
    Catalog,
    /// List warehouses, or one warehouse's stock (admin)
    Warehouses { id: Option<i64> },
    /// List merchants, or one merchant's products (admin)
    Merchants { id: Option<i64> },
    /// List users (admin)
    Users,
    /// Give a user a role (admin)
    AssignRole { user_id: i64, role: String },
    /// Delete a user (admin)
    DeleteUser { id: i64 },
    /// Record a sale through the transaction wizard
    Sell {
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
        /// Cart line as PRODUCT_ID:QTY or PRODUCT_ID:QTY@WAREHOUSE_ID
        #[arg(long = "line", required = true)]
        lines: Vec<LineArg>,
    },
    /// Print a recorded transaction as a receipt
    Receipt { id: i64 },
}

/// `--line 11:2@4`
#[derive(Debug, Clone)]
struct LineArg {
    product_id: i64,
    quantity: i64,
    warehouse_id: Option<i64>,
}

impl FromStr for LineArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (line, warehouse) = match s.split_once('@') {
            Some((line, warehouse)) => (line, Some(warehouse)),
            None => (s, None),
        };
        let (product, quantity) = line
            .split_once(':')
            .ok_or_else(|| format!("expected PRODUCT_ID:QTY, got '{s}'"))?;

        Ok(LineArg {
            product_id: product.trim().parse().map_err(|_| format!("bad product id in '{s}'"))?,
            quantity: quantity.trim().parse().map_err(|_| format!("bad quantity in '{s}'"))?,
            warehouse_id: warehouse
                .map(|w| w.trim().parse().map_err(|_| format!("bad warehouse id in '{s}'")))
                .transpose()?,
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = ClientConfig::load(cli.config.clone()).context("loading client config")?;
    let app = AppState::from_config(config).context("building API client")?;

    auth::initialize_session(&app.session).await;

    match cli.command {
        Command::Login { email, password } => {
            let response = auth::login(&app.session, &email, SecretString::from(password)).await?;
            if cli.json {
                print_json(&response)?;
            } else {
                println!("Signed in as {} -> {}", response.user.name, response.redirect);
            }
        }
        Command::Logout => {
            let response = auth::logout(&app.session, &app.wizard).await;
            if cli.json {
                print_json(&response)?;
            } else {
                println!("Signed out -> {}", response.redirect);
            }
        }
        Command::Whoami => {
            let session = auth::current_session(&app.session);
            if cli.json {
                print_json(&session)?;
            } else {
                match &session.user {
                    Some(user) => {
                        let roles: Vec<_> = user.roles.iter().map(|r| r.as_str()).collect();
                        println!("{} (#{}) roles: {}", user.name, user.id, roles.join(", "));
                        if let Some(merchant) = &user.merchant {
                            println!("merchant: {} (#{})", merchant.name, merchant.id);
                        }
                    }
                    None => println!("Not signed in"),
                }
            }
        }
        Command::Access { path } => {
            let response = navigation::check_access(&app.session, &path);
            if cli.json {
                print_json(&response)?;
            } else {
                match &response.redirect {
                    Some(target) => println!("{} -> redirect to {}", response.path, target),
                    None => println!("{} -> {:?}", response.path, response.decision),
                }
            }
        }
        Command::Menu => {
            let menu = navigation::get_menu(&app.session, &app.config);
            if cli.json {
                print_json(&menu)?;
            } else {
                println!("{}", menu.title);
                let mut section = None;
                for item in &menu.items {
                    if section != Some(item.section) {
                        section = Some(item.section);
                        println!("\n{}", item.section.title());
                    }
                    println!("  {:<20} {}", item.label, item.path);
                }
            }
        }
        Command::Products => {
            let products = wizard::list_merchant_products(&app.client, &app.session).await?;
            if cli.json {
                print_json(&products)?;
            } else {
                print_products(&app.config, &products);
            }
        }
        Command::MyMerchant => {
            let merchant = merchant::get_my_merchant(&app.client, &app.session).await?;
            if cli.json {
                print_json(&merchant)?;
            } else {
                print_merchant(&app.config, &merchant);
            }
        }
        Command::Categories => {
            let categories = catalog::list_categories(&app.client, &app.session).await?;
            if cli.json {
                print_json(&categories)?;
            } else {
                for c in &categories {
                    println!("#{:<5} {}", c.id, c.name);
                }
            }
        }
        Command::Catalog => {
            let products = catalog::list_products(&app.client, &app.session).await?;
            if cli.json {
                print_json(&products)?;
            } else {
                print_products(&app.config, &products);
            }
        }
        Command::Warehouses { id: Some(id) } => {
            let w = warehouse::get_warehouse_stock(&app.client, &app.session, id).await?;
            if cli.json {
                print_json(&w)?;
            } else {
                println!("{} (#{})", w.name, w.id);
                print_products(&app.config, &w.products);
            }
        }
        Command::Warehouses { id: None } => {
            let warehouses = warehouse::list_warehouses(&app.client, &app.session).await?;
            if cli.json {
                print_json(&warehouses)?;
            } else {
                for w in &warehouses {
                    println!("#{:<5} {:<30} {}", w.id, w.name, w.phone.as_deref().unwrap_or(""));
                }
            }
        }
        Command::Merchants { id: Some(id) } => {
            let m = merchant::get_merchant_products(&app.client, &app.session, id).await?;
            if cli.json {
                print_json(&m)?;
            } else {
                print_merchant(&app.config, &m);
            }
        }
        Command::Merchants { id: None } => {
            let merchants = merchant::list_merchants(&app.client, &app.session).await?;
            if cli.json {
                print_json(&merchants)?;
            } else {
                for m in &merchants {
                    let keeper = m.keeper.as_ref().map(|k| k.name.as_str()).unwrap_or("-");
                    println!("#{:<5} {:<30} keeper {}", m.id, m.name, keeper);
                }
            }
        }
        Command::Users => {
            let users = user::list_users(&app.client, &app.session).await?;
            if cli.json {
                print_json(&users)?;
            } else {
                for u in &users {
                    let roles: Vec<_> = u.roles.iter().map(|r| r.as_str()).collect();
                    println!(
                        "#{:<5} {:<24} {:<28} {}",
                        u.id,
                        u.name,
                        u.email.as_deref().unwrap_or(""),
                        roles.join(", ")
                    );
                }
            }
        }
        Command::AssignRole { user_id, role } => {
            user::assign_role(&app.client, &app.session, user_id, &role).await?;
            println!("Role {} assigned to user #{}", role.trim(), user_id);
        }
        Command::DeleteUser { id } => {
            user::delete_user(&app.client, &app.session, id).await?;
            println!("User #{} deleted", id);
        }
        Command::Transactions { all } => {
            let transactions = if all {
                transaction::list_all_transactions(&app.client, &app.session).await?
            } else {
                transaction::list_transactions(&app.client, &app.session).await?
            };
            if cli.json {
                print_json(&transactions)?;
            } else {
                for t in &transactions {
                    println!(
                        "#{:<6} {:<24} {:<16} {:>14}",
                        t.id,
                        t.name,
                        t.phone,
                        t.grand_total
                            .map(|m| app.config.format_money(m))
                            .unwrap_or_default()
                    );
                }
            }
        }
        Command::Sell { name, phone, lines } => {
            let receipt = sell(&app, CustomerForm { name, phone }, &lines).await?;
            if cli.json {
                print_json(&receipt)?;
            } else {
                print_receipt(&app.config, &receipt);
            }
        }
        Command::Receipt { id } => {
            let t = transaction::get_transaction(&app.client, &app.session, id).await?;
            if cli.json {
                print_json(&t)?;
            } else {
                print_transaction(&app.config, &t);
            }
        }
    }

    Ok(())
}

/// Drives the wizard from step one to the success view.
async fn sell(app: &AppState, form: CustomerForm, lines: &[LineArg]) -> anyhow::Result<Receipt> {
    wizard::submit_customer(&app.session, &app.wizard, &form)?;

    for line in lines {
        wizard::add_to_cart(
            &app.client,
            &app.session,
            &app.wizard,
            line.product_id,
            line.quantity,
            line.warehouse_id,
        )
        .await?;
    }

    let review = wizard::proceed_to_review(&app.session, &app.wizard)?;
    if review.readiness.cart_empty {
        bail!("cart is empty, add at least one --line");
    }

    transaction::submit_transaction(&app.client, &app.session, &app.wizard).await?;

    let view = transaction::open_success_view(&app.session, &app.wizard)?;
    match view.receipt {
        Some(receipt) => Ok(receipt),
        None => bail!(
            "no receipt available, see {}",
            view.redirect.unwrap_or_default()
        ),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_products(config: &ConfigState, products: &[Product]) {
    for product in products {
        println!(
            "#{:<5} {:<30} {:>14}  stock {}",
            product.id,
            product.name,
            config.format_money(product.price),
            product
                .listed_stock()
                .map_or_else(|| "-".to_string(), |s| s.to_string())
        );
    }
}

fn print_merchant(config: &ConfigState, merchant: &Merchant) {
    println!("{} (#{})", merchant.name, merchant.id);
    if let Some(keeper) = &merchant.keeper {
        println!("keeper: {}", keeper.name);
    }
    print_products(config, &merchant.products);
}

fn print_receipt(config: &ConfigState, receipt: &Receipt) {
    println!("{}", config.store_title);
    println!("Transaction #{} for {}", receipt.transaction_id, receipt.customer_name);
    println!("  Items      {:>14}", receipt.total_items);
    println!("  Quantity   {:>14}", receipt.total_quantity);
    println!("  Subtotal   {:>14}", config.format_money(receipt.sub_total));
    println!(
        "  VAT {:>2}%    {:>14}",
        config.vat_percent,
        config.format_money(receipt.tax_total)
    );
    println!("  Total      {:>14}", config.format_money(receipt.grand_total));
}

fn print_transaction(config: &ConfigState, t: &Transaction) {
    println!("{}", config.store_title);
    println!("Transaction #{} for {} ({})", t.id, t.name, t.phone);
    for line in &t.transaction_products {
        let name = line
            .product
            .as_ref()
            .map(|p| p.name.as_str())
            .unwrap_or("(product)");
        let total = line.sub_total.or(line.price);
        println!(
            "  {:<28} x{:<4} {:>14}",
            name,
            line.quantity,
            total.map(|m| config.format_money(m)).unwrap_or_default()
        );
    }
    if let Some(sub_total) = t.sub_total {
        println!("  Subtotal   {:>14}", config.format_money(sub_total));
    }
    if let Some(tax_total) = t.tax_total {
        println!("  VAT        {:>14}", config.format_money(tax_total));
    }
    if let Some(grand_total) = t.grand_total {
        println!("  Total      {:>14}", config.format_money(grand_total));
    }
}
