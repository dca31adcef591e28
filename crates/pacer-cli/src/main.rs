mod cmd_brand;
mod cmd_campaign;
mod cmd_config;
mod cmd_init;
mod cmd_jobs;
mod cmd_log_spend;
mod cmd_schedule;
mod cmd_spend_logs;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pacer", version, about = "Campaign budget pacing and dayparting enforcement")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Initialize a new .pacer/ workspace
    Init,
    /// Manage brands and their budget limits
    Brand {
        #[command(subcommand)]
        cmd: BrandCmd,
    },
    /// Manage campaigns and dayparting windows
    Campaign {
        #[command(subcommand)]
        cmd: CampaignCmd,
    },
    /// Log spend for a campaign
    LogSpend {
        /// ID of the campaign
        campaign_id: i64,
        /// Spend amount (decimal)
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },
    /// List recorded spend, newest first
    SpendLogs {
        /// Only entries for this campaign
        #[arg(long)]
        campaign: Option<i64>,
        /// Maximum number of entries to show (0 = unlimited)
        #[arg(long, default_value_t = 50)]
        limit: usize,
        /// Output as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// Pause campaigns outside their dayparting window or at/over budget
    Enforce,
    /// Zero daily spend and reactivate every campaign
    ResetDaily,
    /// Zero monthly spend for every campaign
    ResetMonthly,
    /// Periodic job scheduler
    Schedule {
        #[command(subcommand)]
        cmd: ScheduleCmd,
    },
    /// Read or write workspace config (.pacer/config.json)
    Config {
        #[command(subcommand)]
        cmd: ConfigCmd,
    },
}

#[derive(Subcommand)]
enum BrandCmd {
    /// Create a brand
    Add {
        /// Brand name
        name: String,
        /// Daily budget limit (decimal)
        #[arg(long)]
        daily: String,
        /// Monthly budget limit (decimal)
        #[arg(long)]
        monthly: String,
    },
    /// List brands
    List {
        /// Output as JSON lines
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum CampaignCmd {
    /// Create an active campaign with zero spend
    Add {
        /// Owning brand ID
        brand_id: i64,
        /// Campaign name
        name: String,
    },
    /// List campaigns
    List {
        /// Only active campaigns
        #[arg(long, conflicts_with = "paused")]
        active: bool,
        /// Only paused campaigns
        #[arg(long)]
        paused: bool,
        /// Only campaigns of this brand
        #[arg(long)]
        brand: Option<i64>,
        /// Output as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// Show one campaign with its spend history summary
    Show {
        /// Campaign ID
        id: i64,
    },
    /// Set or clear the campaign's allowed hours [start, end)
    Daypart {
        /// Campaign ID
        id: i64,
        /// First allowed hour (0-23)
        #[arg(required_unless_present = "clear")]
        start: Option<i64>,
        /// First disallowed hour (0-23)
        #[arg(required_unless_present = "clear")]
        end: Option<i64>,
        /// Remove the window (campaign may run at any hour)
        #[arg(long, conflicts_with_all = ["start", "end"])]
        clear: bool,
    },
}

#[derive(Subcommand)]
enum ScheduleCmd {
    /// Show jobs, their cron triggers and next fire times
    List,
    /// Run the scheduler in the foreground until Ctrl-C
    Run,
}

#[derive(Subcommand)]
enum ConfigCmd {
    /// Set a config value
    Set {
        /// Config key (e.g. tick_secs, enforce_cron)
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("PACER_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let cwd = std::env::current_dir()?;

    match cli.cmd {
        Command::Init => cmd_init::execute(&cwd),
        Command::Brand { cmd } => match cmd {
            BrandCmd::Add {
                name,
                daily,
                monthly,
            } => cmd_brand::add(&cwd, &name, &daily, &monthly),
            BrandCmd::List { json } => cmd_brand::list(&cwd, json),
        },
        Command::Campaign { cmd } => match cmd {
            CampaignCmd::Add { brand_id, name } => cmd_campaign::add(&cwd, brand_id, &name),
            CampaignCmd::List {
                active,
                paused,
                brand,
                json,
            } => {
                let is_active = match (active, paused) {
                    (true, _) => Some(true),
                    (_, true) => Some(false),
                    _ => None,
                };
                cmd_campaign::list(&cwd, is_active, brand, json)
            }
            CampaignCmd::Show { id } => cmd_campaign::show(&cwd, id),
            CampaignCmd::Daypart {
                id,
                start,
                end,
                clear,
            } => match (clear, start, end) {
                (true, _, _) => cmd_campaign::clear_daypart(&cwd, id),
                (false, Some(start), Some(end)) => cmd_campaign::set_daypart(&cwd, id, start, end),
                _ => anyhow::bail!("daypart needs <start> <end> or --clear"),
            },
        },
        Command::LogSpend {
            campaign_id,
            amount,
        } => cmd_log_spend::execute(&cwd, campaign_id, &amount),
        Command::SpendLogs {
            campaign,
            limit,
            json,
        } => cmd_spend_logs::execute(&cwd, campaign, limit, json),
        Command::Enforce => cmd_jobs::run_now(&cwd, pacer_sched::Job::EnforceCampaignStatus),
        Command::ResetDaily => cmd_jobs::run_now(&cwd, pacer_sched::Job::ResetDaily),
        Command::ResetMonthly => cmd_jobs::run_now(&cwd, pacer_sched::Job::ResetMonthly),
        Command::Schedule { cmd } => match cmd {
            ScheduleCmd::List => cmd_schedule::list(&cwd),
            ScheduleCmd::Run => cmd_schedule::run(&cwd),
        },
        Command::Config { cmd } => match cmd {
            ConfigCmd::Set { key, value } => cmd_config::set(&cwd, &key, &value),
            ConfigCmd::Get { key } => cmd_config::get(&cwd, &key),
            ConfigCmd::List => cmd_config::list(&cwd),
        },
    }
}
