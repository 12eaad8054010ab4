use anyhow::{Context, Result};
use clap::Parser;
use grocerease::agent::{self, Coordinator};
use grocerease::budget::{BudgetAgent, BudgetReply};
use grocerease::catalog::{self, Program, Store};
use grocerease::config::Config;
use grocerease::llm::{AgentRole, ModelRouter};
use grocerease::nutrition::{HealthCondition, ListEntry, NutritionAgent, UsdaClient};
use grocerease::{handoff, output, LlmOverride};
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "grocerease",
    about = "SNAP/WIC grocery assistant: budget shopping lists and nutrition scoring"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
struct ModelArgs {
    /// Path to config file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// LLM provider override: gemini, anthropic, openai
    #[arg(long)]
    provider: Option<String>,

    /// LLM model override
    #[arg(long)]
    model: Option<String>,

    /// Run every step on local data (no model or USDA calls)
    #[arg(long)]
    offline: bool,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Full pipeline: request -> budget plan -> nutrition -> recommendation
    Ask {
        /// The shopping request, e.g. "I have $40 SNAP and $15 WIC, I'm diabetic"
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,

        #[command(flatten)]
        model: ModelArgs,

        /// Print the whole answer as JSON
        #[arg(long)]
        json: bool,
    },

    /// Budget stage only; saves the plan for the nutrition stage
    Budget {
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,

        /// Path to config file
        #[arg(short, long, default_value = "config.toml")]
        config: PathBuf,
    },

    /// Nutrition stage: score the given items, or the last saved budget plan
    Nutrition {
        /// Food names; reads the saved plan when empty
        items: Vec<String>,

        /// Pasted shopping-list text to parse instead of item names
        #[arg(long, conflicts_with = "items")]
        text: Option<String>,

        /// Health condition to screen for (diabetes, hypertension); repeatable
        #[arg(long = "condition")]
        conditions: Vec<String>,

        /// Use the nutrition model for list parsing and analyst notes
        #[arg(long)]
        llm: bool,

        /// Look up each item in USDA FoodData Central
        #[arg(long)]
        usda: bool,

        #[command(flatten)]
        model: ModelArgs,
    },

    /// Interactive session with the coordinator
    Chat {
        #[command(flatten)]
        model: ModelArgs,
    },

    /// List catalog items
    Catalog {
        /// Only SNAP-eligible items
        #[arg(long)]
        snap: bool,

        /// Only WIC-eligible items
        #[arg(long)]
        wic: bool,

        /// Only one store: walmart or target
        #[arg(long)]
        store: Option<String>,
    },

    /// Print the agent cards as JSON
    Agents {
        #[command(flatten)]
        model: ModelArgs,
    },

    /// Run the full pipeline and write an HTML report
    Report {
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,

        /// Output path for the HTML report
        #[arg(short, long, default_value = "grocerease-report.html")]
        output: PathBuf,

        #[command(flatten)]
        model: ModelArgs,
    },
}

fn load_config(path: &Path, args: Option<&ModelArgs>) -> Result<Config> {
    let mut cfg = Config::load_or_default(path)?;
    if let Some(args) = args {
        if let Some(o) = LlmOverride::from_flags(args.provider.clone(), args.model.clone())? {
            o.apply(&mut cfg.llm);
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

/// `None` when offline was requested or no agent has an API key.
fn build_router(cfg: &Config, args: &ModelArgs) -> Result<Option<ModelRouter>> {
    if args.offline {
        return Ok(None);
    }
    Ok(cfg.build_router()?.into_usable())
}

fn build_usda(cfg: &Config, args: &ModelArgs, force: bool) -> Result<Option<UsdaClient>> {
    if args.offline || !(cfg.usda.enabled || force) {
        return Ok(None);
    }
    Ok(Some(cfg.usda.client()?))
}

fn build_coordinator(args: &ModelArgs) -> Result<Coordinator> {
    let cfg = load_config(&args.config, Some(args))?;
    let router = build_router(&cfg, args)?;
    let usda = build_usda(&cfg, args, false)?;
    Ok(Coordinator::new(router, usda))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "grocerease=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Ask {
            message,
            model,
            json,
        } => {
            let coordinator = build_coordinator(&model)?;
            let answer = coordinator.handle(&message.join(" ")).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&answer)?);
            } else {
                println!("{}", answer.recommendation);
            }
            Ok(())
        }
        Command::Budget { message, config } => {
            let cfg = load_config(&config, None)?;
            let reply = BudgetAgent.respond(&message.join(" "));
            println!("{}", reply.render());
            if let BudgetReply::Plan(plan) = &reply {
                handoff::save_plan(plan, &cfg.handoff.resolved_path())?;
            }
            Ok(())
        }
        Command::Nutrition {
            items,
            text,
            conditions,
            llm,
            usda,
            model,
        } => run_nutrition(items, text, conditions, llm, usda, model).await,
        Command::Chat { model } => run_chat(&model).await,
        Command::Catalog { snap, wic, store } => list_catalog(snap, wic, store.as_deref()),
        Command::Agents { model } => {
            let cfg = load_config(&model.config, Some(&model))?;
            let router = if model.offline {
                None
            } else {
                Some(cfg.build_router()?)
            };
            let cards = agent::cards::cards(router.as_ref());
            println!("{}", serde_json::to_string_pretty(&cards)?);
            Ok(())
        }
        Command::Report {
            message,
            output: output_path,
            model,
        } => {
            let coordinator = build_coordinator(&model)?;
            let answer = coordinator.handle(&message.join(" ")).await;
            let html = output::render_report(&answer)?;
            if let Some(parent) = output_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&output_path, &html)?;
            println!(
                "Report rendered: {} ({} items, source: {:?})",
                output_path.display(),
                answer.shopping_list().len(),
                answer.source
            );
            Ok(())
        }
    }
}

async fn run_nutrition(
    items: Vec<String>,
    text: Option<String>,
    conditions: Vec<String>,
    use_llm: bool,
    use_usda: bool,
    args: ModelArgs,
) -> Result<()> {
    let cfg = load_config(&args.config, Some(&args))?;

    let conditions = conditions
        .iter()
        .map(|c| {
            HealthCondition::parse(c)
                .with_context(|| format!("unknown health condition '{c}' (diabetes, hypertension)"))
        })
        .collect::<Result<Vec<_>>>()?;

    let router = if use_llm {
        build_router(&cfg, &args)?
    } else {
        None
    };
    let usda = build_usda(&cfg, &args, use_usda)?;
    let agent = NutritionAgent::new(
        router.as_ref().and_then(|r| r.keyed_client(AgentRole::Nutrition)),
        usda.as_ref(),
    );

    let outcome = if let Some(text) = text {
        let list = agent.parse_list(&text).await;
        if list.is_empty() {
            anyhow::bail!("no items found in the shopping-list text");
        }
        info!(items = list.len(), "parsed shopping list");
        agent.analyze(&list, &text, &conditions).await
    } else if items.is_empty() {
        let path = cfg.handoff.resolved_path();
        let plan = handoff::load_plan(&path)?;
        info!(path = %path.display(), items = plan.shopping_list().len(), "loaded saved plan");
        agent
            .analyze_plan(plan.shopping_list(), "Analyze my shopping list", &conditions)
            .await
    } else {
        let list: Vec<ListEntry> = items.iter().map(ListEntry::named).collect();
        agent
            .analyze(&list, &items.join(", "), &conditions)
            .await
    };

    println!("{}", outcome.render());
    Ok(())
}

async fn run_chat(args: &ModelArgs) -> Result<()> {
    let coordinator = build_coordinator(args)?;
    println!("GrocerEase: tell me your SNAP/WIC balance and what you need. Type 'quit' to exit.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("\n> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if matches!(input.to_lowercase().as_str(), "quit" | "exit" | "q") {
            break;
        }
        let answer = coordinator.handle(input).await;
        println!("{}", answer.recommendation);
    }
    println!("Goodbye!");
    Ok(())
}

fn list_catalog(snap: bool, wic: bool, store: Option<&str>) -> Result<()> {
    let store = store
        .map(|s| Store::parse(s).with_context(|| format!("unknown store '{s}' (walmart, target)")))
        .transpose()?;

    let items: Vec<_> = catalog::all_items()
        .filter(|i| store.is_none_or(|s| i.store == s))
        .filter(|i| !snap || i.eligible_for(Program::Snap))
        .filter(|i| !wic || i.eligible_for(Program::Wic))
        .collect();

    for item in &items {
        let programs = match (item.snap_eligible, item.wic_eligible) {
            (true, true) => "SNAP+WIC",
            (true, false) => "SNAP",
            (false, true) => "WIC",
            (false, false) => "-",
        };
        println!(
            "{:<8} {:<7} {:>7}  {:<9} {:<12} {}",
            item.product_id,
            item.store,
            item.price().to_string(),
            programs,
            item.category.to_string(),
            item.display_name()
        );
    }
    println!("{} items", items.len());
    Ok(())
}
