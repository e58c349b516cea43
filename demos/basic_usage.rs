//! Basic usage demo.
//!
//! Exercises a `Keyspace` end to end: inserting exact-rational scores a
//! binary float would round, ranking them, and walking a range. Run with:
//!
//!   cargo run --example basic_usage

use ezset::{command, Command, CommandResult, IolConfig, Keyspace, Member, Score};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let keyspace = Keyspace::new(IolConfig::default());

    println!("=== Demo 1: exact rational scores ===");
    command::execute(
        &keyspace,
        "prices",
        Command::Add {
            member: Member::from_str("widget"),
            score: Score::from_decimal_str("19.999999999999999999").unwrap(),
        },
    );
    if let CommandResult::Score(Some(score)) =
        command::execute(&keyspace, "prices", Command::Score { member: Member::from_str("widget") })
    {
        println!("widget price survives round-trip exactly: {score}");
    }
    println!();

    println!("=== Demo 2: ranked leaderboard ===");
    for (name, score) in [("alice", 1500), ("bob", 2200), ("carol", 1800), ("dave", 2200)] {
        command::execute(
            &keyspace,
            "leaderboard",
            Command::Add { member: Member::from_str(name), score: Score::from_i64(score) },
        );
    }
    if let CommandResult::Entries(entries) =
        command::execute(&keyspace, "leaderboard", Command::Range { start: 0, stop: -1, reverse: true })
    {
        for (rank, (member, score)) in entries.iter().enumerate() {
            println!("  #{}: {member} ({score})", rank + 1);
        }
    }
    println!();

    println!("=== Demo 3: increment and re-rank ===");
    command::execute(
        &keyspace,
        "leaderboard",
        Command::IncrBy { member: Member::from_str("alice"), delta: Score::from_i64(1000) },
    );
    if let CommandResult::Rank(rank) = command::execute(
        &keyspace,
        "leaderboard",
        Command::Rank { member: Member::from_str("alice"), score: Score::from_i64(2500) },
    ) {
        println!("alice's new rank after +1000: {rank}");
    }
}
