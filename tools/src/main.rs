//! churn-desk: headless driver for the churn prediction workspace.
//!
//! Usage:
//!   churn-desk domains
//!   churn-desk list    --domain isp [--search 42]
//!   churn-desk show    768805383 --domain credit-card
//!   churn-desk predict 768805383 --domain credit-card
//!   churn-desk estimate --age 23 --tenure 6 --serviceType Basic
//!   churn-desk create  --domain credit-card --Customer_Age 51 --Gender F
//!   churn-desk --ipc-mode --domain insurance
//!
//! Global flags: --domain, --api-url, --origin, --config, --seed, --timeout-ms

use anyhow::Result;
use churn_core::{
    config::DeskConfig,
    creation::NewCustomerForm,
    directory::Customer,
    domain::Domain,
    editor::{self, ProfileField},
    estimator,
    gauge,
    notification::Notification,
    profile::ProfileData,
    transport::UreqTransport,
    workspace::{Workspace, WorkspaceSnapshot},
};
use std::env;
use std::io::{self, BufRead, Write};

/// Dev server that proxies `/api/<domain>` to the backends.
const DEFAULT_ORIGIN: &str = "http://localhost:8080";

const FORM_FIELDS: [&str; 19] = [
    "Customer_Age", "Gender", "Dependent_count", "Education_Level", "Marital_Status",
    "Income_Category", "Card_Category", "Months_on_book", "Total_Relationship_Count",
    "Months_Inactive_12_mon", "Contacts_Count_12_mon", "Credit_Limit", "Total_Revolving_Bal",
    "Avg_Open_To_Buy", "Total_Amt_Chng_Q4_Q1", "Total_Trans_Amt", "Total_Trans_Ct",
    "Total_Ct_Chng_Q4_Q1", "Avg_Utilization_Ratio",
];

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    LoadCustomers,
    Select { id: String },
    Deselect,
    SetField { field: String, value: serde_json::Value },
    Predict,
    Estimate,
    Reset,
    Search { query: String },
    Create { #[serde(default)] form: NewCustomerForm },
    SwitchDomain { domain: String },
    Quit,
}

#[derive(serde::Serialize)]
struct IpcReply {
    #[serde(flatten)]
    state: WorkspaceSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    search_results: Option<Vec<Customer>>,
}

type DeskWorkspace = Workspace<UreqTransport>;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let domain = Domain::from_query(flag_value(&args, "--domain"));
    let config = build_config(&args)?;

    let transport = UreqTransport::new(&config);
    let mut workspace = Workspace::new(domain, config, transport);

    if ipc_mode {
        workspace.load_customers();
        return run_ipc_loop(&mut workspace);
    }

    let command = args.get(1).map(String::as_str).filter(|a| !a.starts_with("--"));
    let target = args.get(2).map(String::as_str).filter(|a| !a.starts_with("--"));

    match command.unwrap_or("list") {
        "domains"  => print_domains(),
        "list"     => cmd_list(&mut workspace, flag_value(&args, "--search")),
        "show"     => cmd_show(&mut workspace, target),
        "predict"  => cmd_predict(&mut workspace, target),
        "estimate" => cmd_estimate(&args),
        "create"   => cmd_create(&mut workspace, &args),
        other      => {
            log::warn!("Unknown command: {other}");
            anyhow::bail!("unknown command '{other}' (try: domains, list, show, predict, estimate, create)")
        }
    }
}

fn build_config(args: &[String]) -> Result<DeskConfig> {
    let mut config = match flag_value(args, "--config") {
        Some(path) => DeskConfig::load(path)?,
        None       => DeskConfig::default(),
    }
    .apply_env();

    if let Some(url) = flag_value(args, "--api-url") {
        config = config.with_api_url(url);
    }
    if let Some(origin) = flag_value(args, "--origin") {
        config.origin = Some(origin.to_string());
    }
    if config.origin.is_none() {
        config.origin = Some(DEFAULT_ORIGIN.to_string());
    }
    if let Some(seed) = parse_flag::<u64>(args, "--seed") {
        config.id_seed = Some(seed);
    }
    if let Some(ms) = parse_flag::<u64>(args, "--timeout-ms") {
        config.timeout_ms = Some(ms);
    }
    config.validate()?;
    Ok(config)
}

// ── One-shot commands ────────────────────────────────────────────────────────

fn print_domains() -> Result<()> {
    println!("=== DOMAINS ===");
    for domain in Domain::ALL {
        println!(
            "  {:<12} {:<12} {:<18} dev port {}",
            domain.key(),
            domain.label(),
            domain.default_base_path(),
            domain.dev_port(),
        );
    }
    Ok(())
}

fn cmd_list(ws: &mut DeskWorkspace, search: Option<&str>) -> Result<()> {
    ws.load_customers();
    let customers = ws.search(search.unwrap_or(""));

    println!("=== {} CUSTOMERS ({}) ===", ws.domain().label().to_uppercase(), ws.base_url());
    if customers.is_empty() {
        println!("  (none)");
    }
    for c in &customers {
        println!("  {:<12} {}", c.id, c.name);
    }
    finish(ws)
}

fn cmd_show(ws: &mut DeskWorkspace, id: Option<&str>) -> Result<()> {
    let id = id.ok_or_else(|| anyhow::anyhow!("show needs a customer id"))?;
    ws.load_customers();
    if ws.select_customer(id) {
        print_profile(ws.profile());
        let breakdown = estimator::explain(ws.profile());
        println!("  offline estimate: {} ({})", breakdown.score, gauge::band(breakdown.score).label());
    }
    finish(ws)
}

fn cmd_predict(ws: &mut DeskWorkspace, id: Option<&str>) -> Result<()> {
    let id = id.ok_or_else(|| anyhow::anyhow!("predict needs a customer id"))?;
    ws.load_customers();
    if ws.select_customer(id) {
        if let Some(score) = ws.run_prediction() {
            print_gauge(ws, score.value());
        }
    }
    finish(ws)
}

fn cmd_estimate(args: &[String]) -> Result<()> {
    let mut profile = ProfileData::default();
    for field in ProfileField::ALL {
        if let Some(raw) = flag_value(args, &format!("--{}", field.key())) {
            editor::set_field(&mut profile, field, raw)?;
        }
    }

    let breakdown = estimator::explain(&profile);
    print_profile(&profile);
    println!();
    println!("=== OFFLINE ESTIMATE ===");
    println!("  base:           {}", breakdown.base);
    for (name, delta) in breakdown.drivers() {
        println!("  {:<15} {:+}", format!("{name}:"), delta);
    }
    println!("  score:          {} ({})", breakdown.score, gauge::band(breakdown.score).label());
    Ok(())
}

fn cmd_create(ws: &mut DeskWorkspace, args: &[String]) -> Result<()> {
    let mut form = NewCustomerForm::default();
    for name in FORM_FIELDS {
        if let Some(value) = flag_value(args, &format!("--{name}")) {
            form.set(name, value);
        }
    }

    ws.load_customers();
    if let Some(customer) = ws.create_customer(&form) {
        println!("=== CREATED ===");
        println!("  id:   {}", customer.id);
        println!("  name: {}", customer.name);
        print_gauge(ws, ws.risk().value());
    }
    finish(ws)
}

// ── IPC loop ─────────────────────────────────────────────────────────────────

fn run_ipc_loop(ws: &mut DeskWorkspace) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    // Initial state, including any notification from the first load.
    write_reply(&mut stdout, ws, None)?;

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        let mut search_results = None;
        match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetState => {}
            IpcCommand::LoadCustomers => {
                ws.load_customers();
            }
            IpcCommand::Select { id } => {
                ws.select_customer(&id);
            }
            IpcCommand::Deselect => ws.deselect(),
            IpcCommand::SetField { field, value } => {
                let field: ProfileField = match field.parse() {
                    Ok(f) => f,
                    Err(e) => {
                        writeln!(stdout, "{}", serde_json::json!({ "error": e.to_string() }))?;
                        stdout.flush()?;
                        continue;
                    }
                };
                let raw = match value {
                    serde_json::Value::String(s) => s,
                    other                        => other.to_string(),
                };
                ws.set_field(field, &raw);
            }
            IpcCommand::Predict => {
                ws.run_prediction();
            }
            IpcCommand::Estimate => {
                ws.estimate_offline();
            }
            IpcCommand::Reset => ws.reset(),
            IpcCommand::Search { query } => search_results = Some(ws.search(&query)),
            IpcCommand::Create { form } => {
                ws.create_customer(&form);
            }
            IpcCommand::SwitchDomain { domain } => {
                ws.switch_domain(Domain::from_query(Some(&domain)));
                ws.load_customers();
            }
        }

        write_reply(&mut stdout, ws, search_results)?;
    }
    Ok(())
}

fn write_reply(
    stdout: &mut io::Stdout,
    ws: &mut DeskWorkspace,
    search_results: Option<Vec<Customer>>,
) -> Result<()> {
    let reply = IpcReply { state: ws.snapshot(), search_results };
    writeln!(stdout, "{}", serde_json::to_string(&reply)?)?;
    stdout.flush()?;
    ws.take_notifications();
    Ok(())
}

// ── Output helpers ───────────────────────────────────────────────────────────

fn print_profile(p: &ProfileData) {
    println!("=== PROFILE ===");
    println!("  age:              {}", p.age);
    println!("  gender:           {}", p.gender);
    println!("  income:           ${}", p.income);
    println!("  tenure:           {} months", p.tenure);
    println!("  service type:     {}", p.service_type);
    println!("  monthly spend:    ${}", p.monthly_spend);
    println!("  auto pay:         {}", if p.auto_pay { "on" } else { "off" });
    println!("  support calls:    {}", p.support_calls);
    println!("  last interaction: {}", p.last_interaction);
}

fn print_gauge(ws: &DeskWorkspace, value: u8) {
    let band = ws.band();
    println!("=== CHURN PREDICTION ===");
    println!("  risk: {value}% {} ({})", band.label(), band.range_caption());
}

/// Print pending notifications; fail the process if any was an error.
fn finish(ws: &mut DeskWorkspace) -> Result<()> {
    let notes: Vec<Notification> = ws.take_notifications();
    let mut failed = false;
    for note in &notes {
        if note.is_error() {
            failed = true;
            eprintln!("[error] {}: {}", note.title, note.description);
        } else {
            println!("[info] {}: {}", note.title, note.description);
        }
    }
    if failed {
        anyhow::bail!("{} operation(s) failed", notes.iter().filter(|n| n.is_error()).count());
    }
    Ok(())
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_flag<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    flag_value(args, flag).and_then(|v| v.parse().ok())
}
