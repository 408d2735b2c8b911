use std::io::{self, BufRead, Write};
use std::sync::Arc;

use colored::Colorize;
use peerbook_gate::{GateConfig, OwnershipGate};
use peerbook_identity::{Identity, KeyringVerifier, SigningKey};
use peerbook_log::{InMemoryLog, ReplicatedLog};
use peerbook_service::{EntryService, ServiceError};
use peerbook_types::Record;

use crate::cli::{Cli, Command};
use crate::config::CliConfig;

type LocalLog = Arc<InMemoryLog<Arc<KeyringVerifier>>>;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = CliConfig::load(cli.config.as_deref())?
        .with_overrides(cli.node_id, cli.threshold);
    config.validate()?;

    match cli.command {
        Command::Shell(_) => cmd_shell(&config),
        Command::Demo(_) => cmd_demo(&config),
    }
}

/// Wire up one replica: keyring-backed gate, in-memory log, fresh actor
/// identity registered with the keyring.
fn open_replica(
    node_id: u16,
    keyring: &Arc<KeyringVerifier>,
    threshold: f64,
) -> EntryService<LocalLog> {
    let gate = OwnershipGate::new(keyring.clone(), GateConfig::default());
    let log = Arc::new(InMemoryLog::new(node_id, gate));
    let signing_key = SigningKey::generate();
    keyring.register(Identity::create(&signing_key));
    EntryService::open_with_threshold(log, signing_key, threshold)
}

fn cmd_shell(config: &CliConfig) -> anyhow::Result<()> {
    let keyring = Arc::new(KeyringVerifier::new());
    let mut service = open_replica(config.node_id, &keyring, config.threshold);

    println!(
        "Peerbook shell on node {} as {}",
        config.node_id.to_string().bold(),
        service.author_id().short_id().cyan()
    );
    println!("Type {} for commands.", "help".bold());

    let stdin = io::stdin();
    loop {
        print!("{} ", "peerbook>".green().bold());
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts.as_slice() {
            [] => {}
            ["quit"] | ["exit"] => break,
            ["help"] => print_help(),
            ["add", name, address @ ..] if !address.is_empty() => {
                shell_add(&mut service, name, &address.join(" "));
            }
            ["del", name] => shell_del(&mut service, name),
            ["search", query @ ..] => shell_search(&service, &query.join(" ")),
            ["list"] => print_records(&service.search("")),
            ["log"] => shell_log(&service),
            _ => println!(
                "{} unrecognized command; type {} for usage",
                "✗".red(),
                "help".bold()
            ),
        }
    }
    Ok(())
}

fn print_help() {
    println!("  {}  create or update your record", "add <name> <address>".bold());
    println!("  {}             delete your record", "del <name>".bold());
    println!("  {}         fuzzy search by name", "search <query>".bold());
    println!("  {}                   list all records", "list".bold());
    println!("  {}                    show the admitted log", "log".bold());
    println!("  {}                   leave the shell", "quit".bold());
}

fn shell_add(service: &mut EntryService<LocalLog>, name: &str, address: &str) {
    match service.add(name, address) {
        Ok(record) => println!(
            "{} {} → {}",
            "✓".green().bold(),
            record.name.yellow(),
            record.address
        ),
        Err(e) => print_service_error(&e),
    }
}

fn shell_del(service: &mut EntryService<LocalLog>, name: &str) {
    match service.delete(name) {
        Ok(true) => println!("{} deleted {}", "✓".green().bold(), name.yellow()),
        Ok(false) => println!("no record named {}", name.yellow()),
        Err(e) => print_service_error(&e),
    }
}

fn shell_search(service: &EntryService<LocalLog>, query: &str) {
    let hits = service.search(query);
    if hits.is_empty() {
        println!("no matches");
    } else {
        print_records(&hits);
    }
}

fn shell_log(service: &EntryService<LocalLog>) {
    let entries = service.log().admitted();
    if entries.is_empty() {
        println!("log is empty");
        return;
    }
    for (seq, entry) in entries.iter().enumerate() {
        println!(
            "{:>4}  {}  {}  {}  {} by {}",
            seq,
            entry.hash.short_hex().dimmed(),
            entry.stamp.to_string().cyan(),
            entry.op.kind,
            entry.op.key().unwrap_or("<none>").yellow(),
            entry.op.identity.author().short_id()
        );
    }
}

fn print_records(records: &[Record]) {
    for record in records {
        println!(
            "  {} → {}  ({}, {})",
            record.name.yellow().bold(),
            record.address,
            record.author.short_id().cyan(),
            record.timestamp.format("%Y-%m-%d %H:%M:%S")
        );
    }
}

fn print_service_error(e: &ServiceError) {
    match e {
        ServiceError::OwnershipViolation { key, owner } => println!(
            "{} {} is owned by {}",
            "✗".red().bold(),
            key.yellow(),
            owner.short_id().cyan()
        ),
        other => println!("{} {}", "✗".red().bold(), other),
    }
}

/// Scripted two-replica walkthrough: independent claims, an ownership
/// rejection, delete-then-reclaim, and convergence after merges.
fn cmd_demo(config: &CliConfig) -> anyhow::Result<()> {
    let keyring = Arc::new(KeyringVerifier::new());
    let mut alice = open_replica(1, &keyring, config.threshold);
    let mut bob = open_replica(2, &keyring, config.threshold);

    println!("{}", "== independent claims ==".bold());
    let record = alice.add("Alice", "wonderland 12")?;
    println!("  node 1 claimed {} → {}", record.name.yellow(), record.address);
    let record = bob.add("Bob", "builder st 9")?;
    println!("  node 2 claimed {} → {}", record.name.yellow(), record.address);

    sync(&mut alice, &mut bob);
    println!("\n{}", "== ownership rejection ==".bold());
    match bob.add("Alice", "intruder lane 1") {
        Err(e) => {
            print!("  node 2 tried to overwrite Alice: ");
            print_service_error(&e);
        }
        Ok(_) => anyhow::bail!("foreign overwrite was admitted"),
    }

    println!("\n{}", "== delete then reclaim ==".bold());
    alice.delete("Alice")?;
    println!("  node 1 deleted {}", "Alice".yellow());
    sync(&mut alice, &mut bob);
    let record = bob.add("Alice", "new owner ave 3")?;
    println!(
        "  node 2 reclaimed {} → {}",
        record.name.yellow(),
        record.address
    );

    sync(&mut alice, &mut bob);
    println!("\n{}", "== convergence ==".bold());
    let mut view_a = alice.search("");
    let mut view_b = bob.search("");
    view_a.sort_by(|x, y| x.name.cmp(&y.name));
    view_b.sort_by(|x, y| x.name.cmp(&y.name));
    anyhow::ensure!(view_a == view_b, "replicas diverged after merge");
    println!("  both replicas hold:");
    print_records(&view_a);
    println!("\n{} replicas converged", "✓".green().bold());
    Ok(())
}

fn sync(a: &mut EntryService<LocalLog>, b: &mut EntryService<LocalLog>) {
    let report_a = a.log().merge(b.log().as_ref());
    let report_b = b.log().merge(a.log().as_ref());
    a.rebuild_index();
    b.rebuild_index();
    println!(
        "  {} merged: {} admitted on node 1, {} on node 2",
        "⇄".cyan(),
        report_a.admitted,
        report_b.admitted
    );
}
