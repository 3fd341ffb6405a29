//! PAPS CLI - back-office administration over JSON-RPC

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tabled::{Table, Tabled};

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:9527";

#[derive(Parser)]
#[command(name = "paps")]
#[command(about = "PAPS marketplace back-office CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RPC server URL
    #[arg(long, env = "PAPS_RPC_URL", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Show platform statistics
    Status,

    /// List merchants
    Merchants,

    /// Activate, deactivate or suspend a merchant
    SetStatus {
        /// Merchant ID
        merchant_id: String,

        #[arg(value_enum)]
        status: MerchantStatus,
    },

    /// Expire ended subscriptions now
    Sweep,
}

#[derive(Clone, Copy, ValueEnum)]
enum MerchantStatus {
    Active,
    Inactive,
    Suspended,
}

impl MerchantStatus {
    fn as_str(&self) -> &'static str {
        match self {
            MerchantStatus::Active => "active",
            MerchantStatus::Inactive => "inactive",
            MerchantStatus::Suspended => "suspended",
        }
    }
}

#[derive(Serialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    method: String,
    params: serde_json::Value,
    id: u64,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    result: Option<serde_json::Value>,
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

#[derive(Deserialize)]
struct MerchantRow {
    id: String,
    shop_name: String,
    address: String,
    status: String,
}

#[derive(Tabled)]
struct MerchantLine {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Shop")]
    shop: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Status")]
    status: String,
}

#[derive(Deserialize)]
struct SummaryRow {
    #[serde(rename = "merchantId")]
    merchant_id: String,
    #[serde(rename = "shopName")]
    shop_name: String,
    #[serde(rename = "totalOrders")]
    total_orders: u64,
    #[serde(rename = "totalRevenue")]
    total_revenue: f64,
}

#[derive(Tabled)]
struct SummaryLine {
    #[tabled(rename = "Merchant")]
    merchant: String,
    #[tabled(rename = "Shop")]
    shop: String,
    #[tabled(rename = "Orders")]
    orders: u64,
    #[tabled(rename = "Revenue (XOF)")]
    revenue: String,
}

async fn call_rpc(url: &str, method: &str, params: serde_json::Value) -> Result<serde_json::Value> {
    let request = JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        method: method.to_string(),
        params,
        id: 1,
    };

    let client = reqwest::Client::new();
    let response: JsonRpcResponse = client
        .post(url)
        .json(&request)
        .send()
        .await
        .context("Failed to connect to server")?
        .json()
        .await
        .context("Failed to parse response")?;

    if let Some(error) = response.error {
        anyhow::bail!("RPC error ({}): {}", error.code, error.message);
    }

    response
        .result
        .ok_or_else(|| anyhow::anyhow!("No result in response"))
}

fn status_label(status: &str) -> colored::ColoredString {
    match status {
        "active" => status.green(),
        "suspended" => status.red(),
        _ => status.yellow(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Status => {
            println!("{}", "Platform Status".cyan().bold());
            println!();

            match call_rpc(&cli.rpc_url, "admin.stats.v1", json!({})).await {
                Ok(stats) => {
                    println!("  {} {}", "RPC URL:".bold(), cli.rpc_url);
                    println!("  {} {}", "Status:".bold(), "ONLINE".green());
                    println!();
                    println!("  {} {}", "Deliveries:".bold(), stats["totalDeliveries"]);
                    println!("  {} {}", "Completed:".bold(), stats["completedDeliveries"]);
                    println!("  {} {}", "Pending:".bold(), stats["pendingDeliveries"]);
                    println!(
                        "  {} {:.1}%",
                        "Completion:".bold(),
                        stats["completionRate"].as_f64().unwrap_or(0.0)
                    );
                    if let Some(minutes) = stats["averageDeliveryMinutes"].as_f64() {
                        println!("  {} {:.0} min", "Avg delivery:".bold(), minutes);
                    }
                    println!(
                        "  {} {:.0} XOF",
                        "Revenue:".bold(),
                        stats["totalRevenue"].as_f64().unwrap_or(0.0)
                    );
                    println!("  {} {} seconds", "Uptime:".bold(), stats["uptime_seconds"]);

                    let rows: Vec<SummaryRow> =
                        serde_json::from_value(stats["merchants"].clone()).unwrap_or_default();
                    if !rows.is_empty() {
                        println!();
                        let lines: Vec<SummaryLine> = rows
                            .into_iter()
                            .map(|r| SummaryLine {
                                merchant: r.merchant_id,
                                shop: r.shop_name,
                                orders: r.total_orders,
                                revenue: format!("{:.0}", r.total_revenue),
                            })
                            .collect();
                        println!("{}", Table::new(lines));
                    }
                }
                Err(e) => {
                    println!("  {} {}", "Status:".bold(), "ERROR".red());
                    println!("  {} {}", "Error:".bold(), e);
                }
            }
        }

        Commands::Merchants => {
            let result = call_rpc(&cli.rpc_url, "admin.merchants.list.v1", json!({})).await?;
            let rows: Vec<MerchantRow> = serde_json::from_value(result["merchants"].clone())
                .context("Unexpected merchant list")?;

            if rows.is_empty() {
                println!("{}", "No merchants registered".yellow());
                return Ok(());
            }

            let lines: Vec<MerchantLine> = rows
                .into_iter()
                .map(|m| MerchantLine {
                    status: status_label(&m.status).to_string(),
                    id: m.id,
                    shop: m.shop_name,
                    address: m.address,
                })
                .collect();
            println!("{}", Table::new(lines));
        }

        Commands::SetStatus {
            merchant_id,
            status,
        } => {
            let params = json!({
                "merchant_id": merchant_id,
                "status": status.as_str(),
            });
            let result = call_rpc(&cli.rpc_url, "admin.merchant.status.v1", params).await?;
            let applied = result["status"].as_str().unwrap_or(status.as_str());

            println!(
                "{} {} is now {}",
                "✓".green().bold(),
                merchant_id,
                status_label(applied)
            );
        }

        Commands::Sweep => {
            let result = call_rpc(&cli.rpc_url, "admin.subscriptions.sweep.v1", json!({})).await?;
            println!(
                "{} {} subscription(s) expired",
                "✓".green().bold(),
                result["expired"]
            );
        }
    }

    Ok(())
}
