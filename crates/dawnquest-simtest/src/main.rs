//! DawnQuest Headless Simulation Harness
//!
//! Validates the pure rules and the engine loop without a UI or a real
//! remote backend. Runs entirely in-process.
//!
//! Usage:
//!   cargo run -p dawnquest-simtest
//!   cargo run -p dawnquest-simtest -- --verbose

use std::sync::Arc;

use chrono::{Days, NaiveDate};

use dawnquest_core::command::{NewTaskKind, PenaltyRef};
use dawnquest_core::outbox::RetryPolicy;
use dawnquest_core::persistence::MemorySnapshotStore;
use dawnquest_core::reconcile::reconcile;
use dawnquest_core::{Command, CommandError, GameEngine, GameState, LoadSource, PlayerId, SnapshotStore};
use dawnquest_logic::attributes::{derive_attributes, XP_PER_POINT};
use dawnquest_logic::class::{find_class, Attribute, AttributeSet, CLASSES, CLASS_BONUS};
use dawnquest_logic::difficulty::Difficulty;
use dawnquest_logic::economy::{self, RewardKind};
use dawnquest_logic::events::{EventStatus, ScheduledEvent};
use dawnquest_logic::goals::Goal;
use dawnquest_logic::habits::{BadHabit, HabitStatus};
use dawnquest_logic::penalties::{ledger, PenaltyState};
use dawnquest_logic::progression::aggregate;
use dawnquest_logic::quests::Quest;
use dawnquest_logic::reminders::{scan, GOAL_LEAD_DAYS};
use dawnquest_logic::tasks::{DailyTask, TaskKind, TaskState};

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== DawnQuest Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Reward table sweep
    results.extend(validate_economy(verbose));

    // 2. Attribute derivation
    results.extend(validate_attributes(verbose));

    // 3. Progression aggregation
    results.extend(validate_progression(verbose));

    // 4. Penalty ledger partitioning
    results.extend(validate_penalties(verbose));

    // 5. Reminder fences
    results.extend(validate_reminders(verbose));

    // 6. Snapshot merge semantics
    results.extend(validate_snapshot_merge(verbose));

    // 7. Full engine session
    results.extend(validate_engine_session(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn check(results: &mut Vec<TestResult>, name: &str, passed: bool, detail: String) {
    results.push(TestResult {
        name: name.into(),
        passed,
        detail,
    });
}

// ── Entity builders ─────────────────────────────────────────────────────

fn completed_task(id: &str, difficulty: Difficulty) -> DailyTask {
    DailyTask {
        id: id.into(),
        name: format!("task {id}"),
        kind: TaskKind::OneShot,
        state: TaskState::Completed,
        difficulty,
        penalty: "push-ups".into(),
    }
}

fn failed_task(id: &str, penalty_state: PenaltyState) -> DailyTask {
    DailyTask {
        state: TaskState::Failed(penalty_state),
        ..completed_task(id, Difficulty::Normal)
    }
}

fn resisted_habit(id: &str) -> BadHabit {
    BadHabit {
        id: id.into(),
        name: format!("habit {id}"),
        strategy: String::new(),
        reward_xp: 20,
        reward_coins: 5,
        penalty: "donate".into(),
        status: HabitStatus::Resisted,
    }
}

fn zero_seeds() -> AttributeSet {
    AttributeSet {
        force: 0,
        discipline: 0,
        consistency: 0,
        agility: 0,
    }
}

// ── 1. Reward table ─────────────────────────────────────────────────────

fn validate_economy(verbose: bool) -> Vec<TestResult> {
    println!("--- Reward Table ---");
    let mut results = Vec::new();

    // Pinned values per tier: half-up rounding of base x multiplier.
    let expected_task_xp = [8, 11, 15, 19, 23];
    for (difficulty, want) in Difficulty::ALL.into_iter().zip(expected_task_xp) {
        let got = economy::reward(RewardKind::Task, difficulty).xp;
        check(
            &mut results,
            &format!("task_xp_{difficulty:?}"),
            got == want,
            format!("{got} xp (want {want})"),
        );
        if verbose {
            println!("  {:?}: {} xp", difficulty, got);
        }
    }

    // Rewards never decrease as the tier climbs.
    let mut monotone = true;
    for kind in [RewardKind::Task, RewardKind::Quest] {
        let mut prev = 0;
        for difficulty in Difficulty::ALL {
            let r = economy::reward(kind, difficulty);
            if r.xp < prev {
                monotone = false;
            }
            prev = r.xp;
        }
    }
    check(
        &mut results,
        "rewards_monotone",
        monotone,
        "xp non-decreasing across tiers".into(),
    );

    // Goals pay flat regardless of the difficulty argument.
    let flat = Difficulty::ALL
        .into_iter()
        .all(|d| economy::reward(RewardKind::Goal, d) == economy::reward(RewardKind::Goal, Difficulty::Normal));
    check(
        &mut results,
        "goal_reward_flat",
        flat && economy::reward(RewardKind::Goal, Difficulty::Normal).xp == economy::GOAL_XP,
        format!("{} xp at every tier", economy::GOAL_XP),
    );

    // Presentation metadata is complete and distinct per tier.
    let mut labels: Vec<&str> = Difficulty::ALL.iter().map(|d| d.label()).collect();
    let mut icons: Vec<&str> = Difficulty::ALL.iter().map(|d| d.icon()).collect();
    labels.sort_unstable();
    labels.dedup();
    icons.sort_unstable();
    icons.dedup();
    let names_nonempty = Difficulty::ALL.iter().all(|d| !d.name().is_empty());
    check(
        &mut results,
        "tier_metadata_distinct",
        labels.len() == 5 && icons.len() == 5 && names_nonempty,
        format!("{} labels, {} icons", labels.len(), icons.len()),
    );

    // Fines scale with tier for tasks; habits fine flat.
    let fine_epic = economy::task_failure_fine(Difficulty::Epic);
    let fine_trivial = economy::task_failure_fine(Difficulty::VeryEasy);
    check(
        &mut results,
        "fines_scale",
        fine_epic == 8 && fine_trivial == 3 && economy::habit_failure_fine() == economy::FAILURE_FINE,
        format!("epic {fine_epic}, trivial {fine_trivial}, habit {}", economy::habit_failure_fine()),
    );

    results
}

// ── 2. Attribute derivation ─────────────────────────────────────────────

fn validate_attributes(verbose: bool) -> Vec<TestResult> {
    println!("--- Attribute Derivation ---");
    let mut results = Vec::new();

    // One resisted habit: 50 discipline xp, 30 agility xp, no levels yet.
    let habits = [resisted_habit("h1")];
    let report = derive_attributes(&[], &habits, &[], &[], &zero_seeds(), None);
    check(
        &mut results,
        "habit_feeds_discipline_and_agility",
        report.get(Attribute::Discipline).xp_into_next == 50
            && report.get(Attribute::Agility).xp_into_next == 30
            && report.get(Attribute::Force).value == 0,
        format!(
            "discipline {}xp, agility {}xp",
            report.get(Attribute::Discipline).xp_into_next,
            report.get(Attribute::Agility).xp_into_next
        ),
    );

    // Two resisted habits cross the 100-xp point boundary on discipline.
    let habits = [resisted_habit("h1"), resisted_habit("h2")];
    let report = derive_attributes(&[], &habits, &[], &[], &zero_seeds(), None);
    let discipline = report.get(Attribute::Discipline);
    check(
        &mut results,
        "point_boundary",
        discipline.value == 1 && discipline.xp_into_next == 0,
        format!("{} points, {} xp over", discipline.value, discipline.xp_into_next),
    );
    if verbose {
        println!("  XP_PER_POINT = {}", XP_PER_POINT);
    }

    // Class bonus lands only on the favored pair.
    for class in CLASSES.iter() {
        let report = derive_attributes(&[], &[], &[], &[], &zero_seeds(), Some(class));
        let bonus_ok = Attribute::ALL.into_iter().all(|attr| {
            let v = report.get(attr);
            if class.favors(attr) {
                v.class_bonus == CLASS_BONUS && v.value == CLASS_BONUS
            } else {
                v.class_bonus == 0 && v.value == 0
            }
        });
        check(
            &mut results,
            &format!("class_bonus_{}", class.id),
            bonus_ok,
            format!("+{} on favored attributes only", CLASS_BONUS),
        );
    }

    // find_class is consistent with the roster.
    let roster_ok = CLASSES.iter().all(|c| find_class(c.id).is_some()) && find_class("bard").is_none();
    check(
        &mut results,
        "class_roster_lookup",
        roster_ok,
        format!("{} classes resolvable", CLASSES.len()),
    );

    results
}

// ── 3. Progression aggregation ──────────────────────────────────────────

fn validate_progression(verbose: bool) -> Vec<TestResult> {
    println!("--- Progression ---");
    let mut results = Vec::new();
    let seeds = zero_seeds();

    // One normal task with zero seeds: no multipliers yet.
    let tasks = [completed_task("t1", Difficulty::Normal)];
    let attrs = derive_attributes(&tasks, &[], &[], &[], &seeds, None);
    let report = aggregate(&tasks, &[], &[], &[], &[], 0, &attrs);
    check(
        &mut results,
        "single_task_baseline",
        report.total_xp == 15 && report.coins == 10 && report.level == 1,
        format!("{} xp, {} coins, level {}", report.total_xp, report.coins, report.level),
    );

    // Seven normal tasks: 105 xp gross, discipline multiplier kicks in.
    // 7 x 40 = 280 discipline xp = 2 points -> x1.10 -> 115 xp, level 2.
    let tasks: Vec<_> = (0..7)
        .map(|i| completed_task(&format!("t{i}"), Difficulty::Normal))
        .collect();
    let attrs = derive_attributes(&tasks, &[], &[], &[], &seeds, None);
    let report = aggregate(&tasks, &[], &[], &[], &[], 0, &attrs);
    check(
        &mut results,
        "level_boundary",
        report.total_xp == 115 && report.level == 2 && report.xp_into_level == 15,
        format!("{} xp -> level {} ({} into)", report.total_xp, report.level, report.xp_into_level),
    );
    if verbose {
        println!("  discipline points: {}", attrs.get(Attribute::Discipline).value);
    }

    // Fines bite only while outstanding; shielded failures cost nothing.
    let tasks = [
        completed_task("t1", Difficulty::Normal),
        failed_task("f1", PenaltyState::Outstanding),
        failed_task("f2", PenaltyState::Resolved),
        failed_task("f3", PenaltyState::Shielded),
    ];
    let attrs = derive_attributes(&tasks, &[], &[], &[], &seeds, None);
    let report = aggregate(&tasks, &[], &[], &[], &[], 0, &attrs);
    check(
        &mut results,
        "fines_outstanding_only",
        report.coins == 5,
        format!("{} coins (10 earned, one 5-coin fine)", report.coins),
    );

    // The balance clamps at zero instead of going negative.
    let tasks = [failed_task("f1", PenaltyState::Outstanding)];
    let attrs = derive_attributes(&tasks, &[], &[], &[], &seeds, None);
    let report = aggregate(&tasks, &[], &[], &[], &[], 0, &attrs);
    check(
        &mut results,
        "balance_clamped",
        report.coins == 0,
        format!("{} coins with only fines on record", report.coins),
    );

    // Quests and goals feed the same aggregate.
    let quests = [Quest {
        id: "q1".into(),
        name: "quest".into(),
        difficulty: Difficulty::Normal,
        completed: true,
    }];
    let goals = [Goal {
        id: "g1".into(),
        name: "goal".into(),
        total: 1.0,
        progress: 1.0,
        unit: String::new(),
        completed: true,
        start_date: None,
        end_date: None,
        notified_soon: false,
    }];
    let attrs = derive_attributes(&[], &[], &quests, &goals, &seeds, None);
    let report = aggregate(&[], &[], &quests, &goals, &[], 0, &attrs);
    // 30 + 100 = 130 gross xp; discipline 100xp -> 1 point -> x1.05 -> 136.
    check(
        &mut results,
        "quest_and_goal_xp",
        report.total_xp == 136,
        format!("{} xp from one quest and one goal", report.total_xp),
    );

    results
}

// ── 4. Penalty ledger ───────────────────────────────────────────────────

fn validate_penalties(_verbose: bool) -> Vec<TestResult> {
    println!("--- Penalty Ledger ---");
    let mut results = Vec::new();

    let tasks = [
        failed_task("out", PenaltyState::Outstanding),
        failed_task("res", PenaltyState::Resolved),
        failed_task("shield", PenaltyState::Shielded),
        completed_task("done", Difficulty::Normal),
    ];
    let mut ceded = resisted_habit("hout");
    ceded.status = HabitStatus::Failed(PenaltyState::Outstanding);
    let habits = [ceded];

    let ledger = ledger(&tasks, &habits);
    check(
        &mut results,
        "ledger_partition",
        ledger.active.len() == 2 && ledger.resolved.len() == 1,
        format!("{} active, {} resolved", ledger.active.len(), ledger.resolved.len()),
    );
    check(
        &mut results,
        "shielded_invisible",
        !ledger
            .active
            .iter()
            .chain(ledger.resolved.iter())
            .any(|e| e.id == "shield"),
        "shielded failure absent from both lists".into(),
    );

    results
}

// ── 5. Reminders ────────────────────────────────────────────────────────

fn validate_reminders(_verbose: bool) -> Vec<TestResult> {
    println!("--- Reminders ---");
    let mut results = Vec::new();
    let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
    let day = |offset: u64| today.checked_add_days(Days::new(offset)).unwrap();

    let goal = |end: NaiveDate| Goal {
        id: "g".into(),
        name: "ship it".into(),
        total: 10.0,
        progress: 2.0,
        unit: "steps".into(),
        completed: false,
        start_date: None,
        end_date: Some(end),
        notified_soon: false,
    };

    let at_fence = scan(&[goal(day(GOAL_LEAD_DAYS as u64))], &[], today);
    let past_fence = scan(&[goal(day(GOAL_LEAD_DAYS as u64 + 1))], &[], today);
    let overdue = scan(&[goal(today.pred_opt().unwrap())], &[], today);
    check(
        &mut results,
        "goal_fence",
        at_fence.len() == 1 && past_fence.is_empty() && overdue.is_empty(),
        format!("fires at D+{GOAL_LEAD_DAYS}, silent past it and after the deadline"),
    );

    let event = ScheduledEvent {
        id: "e".into(),
        name: "exam".into(),
        description: String::new(),
        date: day(10),
        lead_days: 10,
        status: EventStatus::Pending,
        notified_soon: false,
    };
    let mut shorter = event.clone();
    shorter.lead_days = 9;
    check(
        &mut results,
        "event_own_lead",
        scan(&[], &[event], today).len() == 1 && scan(&[], &[shorter], today).is_empty(),
        "each event honors its configured lead".into(),
    );

    let fraction = goal(day(1)).fraction();
    check(
        &mut results,
        "goal_fraction",
        (fraction - 0.2).abs() < f64::EPSILON,
        format!("2/10 progress reads as {fraction}"),
    );

    results
}

// ── 6. Snapshot merge ───────────────────────────────────────────────────

fn validate_snapshot_merge(_verbose: bool) -> Vec<TestResult> {
    println!("--- Snapshot Merge ---");
    let mut results = Vec::new();

    // Old snapshots missing fields default-fill instead of failing.
    let partial: Result<GameState, _> = serde_json::from_str(r#"{"bonus_xp": 30}"#);
    let ok = match partial {
        Ok(state) => state.bonus_xp == 30 && state.shop_items.len() == 4,
        Err(_) => false,
    };
    check(
        &mut results,
        "partial_snapshot_loads",
        ok,
        "missing fields take defaults".into(),
    );

    // Newer snapshots with unknown fields still load on this reader.
    let future: Result<GameState, _> =
        serde_json::from_str(r#"{"protection_active": true, "someday": []}"#);
    check(
        &mut results,
        "unknown_fields_ignored",
        matches!(future, Ok(ref s) if s.protection_active),
        "forward-written snapshot readable".into(),
    );

    results
}

// ── 7. Engine session ───────────────────────────────────────────────────

fn validate_engine_session(verbose: bool) -> Vec<TestResult> {
    println!("--- Engine Session ---");
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            return vec![TestResult {
                name: "runtime".into(),
                passed: false,
                detail: format!("tokio runtime failed to start: {e}"),
            }]
        }
    };
    runtime.block_on(engine_session(verbose))
}

async fn engine_session(verbose: bool) -> Vec<TestResult> {
    let mut results = Vec::new();
    let local = Arc::new(MemorySnapshotStore::new());
    let remote = Arc::new(MemorySnapshotStore::new());
    let player = PlayerId::new_random();
    let retry = RetryPolicy {
        attempts: 2,
        backoff: std::time::Duration::from_millis(1),
    };

    let mut engine = GameEngine::load(player.clone(), local.clone(), remote.clone(), retry);
    check(
        &mut results,
        "fresh_session",
        engine.load_source() == LoadSource::Fresh && engine.progression().level == 1,
        format!("{:?} load, level {}", engine.load_source(), engine.progression().level),
    );

    // Earn coins with three completed tasks.
    let mut last_notice = String::new();
    for name in ["stretch", "journal", "deep work"] {
        let ok = engine.apply(&Command::CreateTask {
            name: name.into(),
            penalty: "no dessert".into(),
            difficulty: Difficulty::Normal,
            kind: NewTaskKind::OneShot,
        });
        if ok.is_err() {
            check(&mut results, "create_task", false, format!("{ok:?}"));
            return results;
        }
        let id = engine.state().tasks.last().map(|t| t.id.clone()).unwrap_or_default();
        if let Ok(notices) = engine.apply(&Command::CompleteTask { id }) {
            last_notice = notices.into_iter().next().unwrap_or_default();
        }
    }
    check(
        &mut results,
        "coins_earned",
        engine.progression().coins == 33,
        format!("{} coins after three normal tasks", engine.progression().coins),
    );
    if verbose {
        println!("  last notice: {last_notice}");
    }

    // Only one epic may be pending at a time.
    engine
        .apply(&Command::CreateTask {
            name: "slay the dragon".into(),
            penalty: "week without games".into(),
            difficulty: Difficulty::Epic,
            kind: NewTaskKind::OneShot,
        })
        .ok();
    let second_epic = engine.apply(&Command::CreateTask {
        name: "slay a second dragon".into(),
        penalty: "p".into(),
        difficulty: Difficulty::Epic,
        kind: NewTaskKind::OneShot,
    });
    check(
        &mut results,
        "epic_exclusivity",
        second_epic == Err(CommandError::EpicAlreadyPending),
        format!("{second_epic:?}"),
    );

    // Buy the cloak (50 coins would be short; buy the indulgence at 15
    // first to prove the audit trail, then check the shortfall error).
    let purchase = engine.apply(&Command::PurchaseItem {
        item_id: "small-indulgence".into(),
    });
    let price_pinned = engine
        .state()
        .purchases
        .first()
        .map(|p| p.price == 15)
        .unwrap_or(false);
    check(
        &mut results,
        "purchase_audit",
        purchase.is_ok() && price_pinned,
        format!("price captured at purchase time: {price_pinned}"),
    );

    let broke = engine.apply(&Command::PurchaseItem {
        item_id: "cloak-of-providence".into(),
    });
    check(
        &mut results,
        "insufficient_coins",
        matches!(broke, Err(CommandError::InsufficientCoins { need: 50, .. })),
        format!("{broke:?}"),
    );

    // Protection shields exactly one failure.
    let epic_id = engine
        .state()
        .tasks
        .iter()
        .find(|t| t.difficulty == Difficulty::Epic)
        .map(|t| t.id.clone())
        .unwrap_or_default();
    {
        // Hand the hero a cloak charge directly; purchasing is covered above.
        // Drain the old session's writer first so no stale snapshot lands
        // on top of the seeded one.
        engine.flush().await;
        let mut state = engine.state().clone();
        state.protection_active = true;
        remote.save(&player, &state).ok();
        engine = GameEngine::load(player.clone(), local.clone(), remote.clone(), retry);
    }
    let notices = engine.apply(&Command::FailTask { id: epic_id.clone() }).unwrap_or_default();
    let shielded = engine.penalties().active.is_empty()
        && notices.iter().any(|n| n.contains("absorbed"))
        && !engine.state().protection_active;
    check(
        &mut results,
        "protection_consumed",
        shielded,
        "first failure shielded, charge spent".into(),
    );

    let _ = engine.apply(&Command::ReopenTask { id: epic_id.clone() });
    let _ = engine.apply(&Command::FailTask { id: epic_id.clone() });
    check(
        &mut results,
        "second_failure_outstanding",
        engine.penalties().active.len() == 1,
        format!("{} active penance", engine.penalties().active.len()),
    );

    // Resolve it and confirm the ledger moves.
    let _ = engine.apply(&Command::SetPenaltyResolved {
        target: PenaltyRef::Task(epic_id),
        resolved: true,
    });
    check(
        &mut results,
        "penance_resolved",
        engine.penalties().active.is_empty() && engine.penalties().resolved.len() == 1,
        "ledger moved the entry to resolved".into(),
    );

    // Flush, then reopen the session: the remote snapshot must win.
    engine.flush().await;
    let (reloaded, source) = reconcile(local.as_ref(), remote.as_ref(), &player);
    check(
        &mut results,
        "session_reload",
        source == LoadSource::Remote && reloaded == *engine.state(),
        format!("{source:?} reload matches live state"),
    );

    results
}
