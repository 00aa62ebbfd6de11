//! Mutation intents and the pure reducer.
//!
//! Every user action at the presentation boundary becomes a [`Command`].
//! [`reduce`] takes the current snapshot and produces the next one as a
//! whole new value (copy-on-write, never in-place partial updates), plus
//! user-facing notices. Malformed intents are rejected with a
//! [`CommandError`] before they touch state; intents whose target id no
//! longer resolves are silent no-ops, never errors.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use dawnquest_logic::attributes::derive_attributes;
use dawnquest_logic::class::find_class;
use dawnquest_logic::difficulty::Difficulty;
use dawnquest_logic::events::{EventStatus, ScheduledEvent};
use dawnquest_logic::goals::Goal;
use dawnquest_logic::habits::{BadHabit, HabitStatus, DEFAULT_RESIST_COINS, DEFAULT_RESIST_XP};
use dawnquest_logic::penalties::PenaltyState;
use dawnquest_logic::progression::aggregate;
use dawnquest_logic::quests::Quest;
use dawnquest_logic::shop::{
    InventoryEntry, ItemCategory, ItemEffect, Purchase, ShopItem, CONVERT_PENALTY_BONUS_XP,
};
use dawnquest_logic::tasks::{DailyTask, TaskKind, TaskState};

use crate::state::{GameState, MissionsTab, Screen};

/// Task shape chosen at creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewTaskKind {
    OneShot,
    Progress { target: f64, unit: String },
}

/// Addresses one penalty by its owning entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyRef {
    Task(String),
    Habit(String),
}

/// Addresses one reminder source for acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderTarget {
    Goal(String),
    Event(String),
}

/// A discrete mutation intent from the presentation boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    CreateTask {
        name: String,
        penalty: String,
        difficulty: Difficulty,
        kind: NewTaskKind,
    },
    /// Metadata only; lifecycle state and progress are untouched.
    EditTask {
        id: String,
        name: String,
        penalty: String,
        difficulty: Difficulty,
    },
    CompleteTask { id: String },
    FailTask { id: String },
    /// Back to pending; any shield on the failure is cleared.
    ReopenTask { id: String },
    AdjustTaskProgress { id: String, delta: f64 },
    DeleteTask { id: String },

    CreateHabit {
        name: String,
        strategy: String,
        penalty: String,
    },
    EditHabit {
        id: String,
        name: String,
        strategy: String,
        penalty: String,
    },
    ResistHabit { id: String },
    CedeHabit { id: String },
    ResetHabit { id: String },
    DeleteHabit { id: String },

    CreateQuest { name: String, difficulty: Difficulty },
    EditQuest {
        id: String,
        name: String,
        difficulty: Difficulty,
    },
    ToggleQuest { id: String },
    DeleteQuest { id: String },

    CreateGoal {
        name: String,
        total: f64,
        unit: String,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    },
    AdjustGoalProgress { id: String, delta: f64 },
    EditGoal {
        id: String,
        name: String,
        total: f64,
        unit: String,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    },
    ToggleGoal { id: String },
    DeleteGoal { id: String },

    CreateEvent {
        name: String,
        description: String,
        date: NaiveDate,
        lead_days: i64,
    },
    EditEvent {
        id: String,
        name: String,
        description: String,
        date: NaiveDate,
        lead_days: i64,
    },
    ToggleEvent { id: String },
    DeleteEvent { id: String },

    CreateItem {
        name: String,
        description: String,
        cost: i64,
        category: ItemCategory,
        effect: Option<ItemEffect>,
    },
    EditItem {
        id: String,
        name: String,
        description: String,
        cost: i64,
        category: ItemCategory,
    },
    DeleteItem { id: String },
    PurchaseItem { item_id: String },
    /// Consume an inventory entry, optionally aimed at a penalty.
    UseItem {
        entry_id: String,
        target: Option<PenaltyRef>,
    },

    SetPenaltyResolved { target: PenaltyRef, resolved: bool },
    SetClass { class_id: Option<String> },
    AcknowledgeReminder { target: ReminderTarget },
    SelectScreen { screen: Screen },
    SelectMissionsTab { tab: MissionsTab },
}

/// Validation rejections. Nothing here is fatal; the intent simply never
/// reaches state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("a name is required")]
    EmptyName,
    #[error("a failure penalty is required")]
    EmptyPenalty,
    #[error("target must be a number greater than zero")]
    InvalidTarget,
    #[error("progress amount must be a finite number")]
    NonFiniteDelta,
    #[error("an epic task is already pending")]
    EpicAlreadyPending,
    #[error("reminder lead time cannot be negative")]
    NegativeLeadTime,
    #[error("item cost cannot be negative")]
    NegativeCost,
    #[error("unknown class `{0}`")]
    UnknownClass(String),
    #[error("not enough coins: need {need}, have {have}")]
    InsufficientCoins { need: u64, have: u64 },
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn require_name(name: &str) -> Result<(), CommandError> {
    if name.trim().is_empty() {
        Err(CommandError::EmptyName)
    } else {
        Ok(())
    }
}

fn require_penalty(penalty: &str) -> Result<(), CommandError> {
    if penalty.trim().is_empty() {
        Err(CommandError::EmptyPenalty)
    } else {
        Ok(())
    }
}

fn require_positive(value: f64) -> Result<(), CommandError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CommandError::InvalidTarget)
    }
}

fn require_finite(delta: f64) -> Result<(), CommandError> {
    if delta.is_finite() {
        Ok(())
    } else {
        Err(CommandError::NonFiniteDelta)
    }
}

/// Spendable coins re-derived from the full history of `state`.
fn current_coins(state: &GameState) -> u64 {
    let class = state.class_id.as_deref().and_then(find_class);
    let attrs = derive_attributes(
        &state.tasks,
        &state.habits,
        &state.quests,
        &state.goals,
        &state.initial_attributes,
        class,
    );
    aggregate(
        &state.tasks,
        &state.habits,
        &state.quests,
        &state.goals,
        &state.purchases,
        state.bonus_xp,
        &attrs,
    )
    .coins
}

/// Resolve the targeted penalty if it is currently outstanding.
/// Returns false (leaving state untouched) for stale or non-active targets.
fn resolve_active_penalty(state: &mut GameState, target: &PenaltyRef) -> bool {
    match target {
        PenaltyRef::Task(id) => {
            if let Some(task) = state.task_mut(id) {
                if task.state == TaskState::Failed(PenaltyState::Outstanding) {
                    task.state = TaskState::Failed(PenaltyState::Resolved);
                    return true;
                }
            }
            false
        }
        PenaltyRef::Habit(id) => {
            if let Some(habit) = state.habit_mut(id) {
                if habit.status == HabitStatus::Failed(PenaltyState::Outstanding) {
                    habit.status = HabitStatus::Failed(PenaltyState::Resolved);
                    return true;
                }
            }
            false
        }
    }
}

/// Consume the protection charge if armed; returns the penalty state the
/// fresh failure should carry.
fn penalty_on_failure(state: &mut GameState, notices: &mut Vec<String>) -> PenaltyState {
    if state.protection_active {
        state.protection_active = false;
        notices.push("🛡️ The Cloak of Providence absorbed the blow!".to_string());
        PenaltyState::Shielded
    } else {
        PenaltyState::Outstanding
    }
}

/// Apply one command to `state`, producing the next snapshot and any
/// user-facing notices.
pub fn reduce(
    state: &GameState,
    command: &Command,
    now: DateTime<Utc>,
) -> Result<(GameState, Vec<String>), CommandError> {
    let mut next = state.clone();
    let mut notices = Vec::new();

    match command {
        Command::CreateTask {
            name,
            penalty,
            difficulty,
            kind,
        } => {
            require_name(name)?;
            require_penalty(penalty)?;
            if *difficulty == Difficulty::Epic && next.has_pending_epic() {
                return Err(CommandError::EpicAlreadyPending);
            }
            let kind = match kind {
                NewTaskKind::OneShot => TaskKind::OneShot,
                NewTaskKind::Progress { target, unit } => {
                    require_positive(*target)?;
                    TaskKind::Progress {
                        target: *target,
                        progress: 0.0,
                        unit: unit.clone(),
                    }
                }
            };
            next.tasks.push(DailyTask {
                id: new_id(),
                name: name.trim().to_string(),
                kind,
                state: TaskState::Pending,
                difficulty: *difficulty,
                penalty: penalty.trim().to_string(),
            });
        }
        Command::EditTask {
            id,
            name,
            penalty,
            difficulty,
        } => {
            require_name(name)?;
            require_penalty(penalty)?;
            if *difficulty == Difficulty::Epic {
                let other_epic_pending = next
                    .tasks
                    .iter()
                    .any(|t| t.id != *id && t.difficulty == Difficulty::Epic && t.is_pending());
                if other_epic_pending && next.task(id).map(|t| t.is_pending()).unwrap_or(false) {
                    return Err(CommandError::EpicAlreadyPending);
                }
            }
            if let Some(task) = next.task_mut(id) {
                task.name = name.trim().to_string();
                task.penalty = penalty.trim().to_string();
                task.difficulty = *difficulty;
            }
        }
        Command::CompleteTask { id } => {
            if let Some(task) = next.task_mut(id) {
                task.state = TaskState::Completed;
                notices.push("⚔️ Victory! Your discipline is rewarded.".to_string());
            }
        }
        Command::FailTask { id } => {
            if next.task(id).is_some() {
                let penalty = penalty_on_failure(&mut next, &mut notices);
                if let Some(task) = next.task_mut(id) {
                    task.state = TaskState::Failed(penalty);
                }
            }
        }
        Command::ReopenTask { id } => {
            if let Some(task) = next.task_mut(id) {
                task.state = TaskState::Pending;
            }
        }
        Command::AdjustTaskProgress { id, delta } => {
            require_finite(*delta)?;
            if let Some(task) = next.task_mut(id) {
                if task.state != TaskState::Pending {
                    return Ok((next, notices));
                }
                if let TaskKind::Progress {
                    target, progress, ..
                } = &mut task.kind
                {
                    *progress = (*progress + delta).max(0.0);
                    if *progress >= *target {
                        task.state = TaskState::Completed;
                        notices.push("⚔️ Victory! Your discipline is rewarded.".to_string());
                    }
                }
            }
        }
        Command::DeleteTask { id } => next.tasks.retain(|t| t.id != *id),

        Command::CreateHabit {
            name,
            strategy,
            penalty,
        } => {
            require_name(name)?;
            require_penalty(penalty)?;
            next.habits.push(BadHabit {
                id: new_id(),
                name: name.trim().to_string(),
                strategy: strategy.clone(),
                reward_xp: DEFAULT_RESIST_XP,
                reward_coins: DEFAULT_RESIST_COINS,
                penalty: penalty.trim().to_string(),
                status: HabitStatus::Pending,
            });
        }
        Command::EditHabit {
            id,
            name,
            strategy,
            penalty,
        } => {
            require_name(name)?;
            require_penalty(penalty)?;
            if let Some(habit) = next.habit_mut(id) {
                habit.name = name.trim().to_string();
                habit.strategy = strategy.clone();
                habit.penalty = penalty.trim().to_string();
            }
        }
        Command::ResistHabit { id } => {
            if let Some(habit) = next.habit_mut(id) {
                habit.status = HabitStatus::Resisted;
                notices.push("🌿 Fortitude proven.".to_string());
            }
        }
        Command::CedeHabit { id } => {
            if next.habits.iter().any(|h| h.id == *id) {
                let penalty = penalty_on_failure(&mut next, &mut notices);
                if let Some(habit) = next.habit_mut(id) {
                    habit.status = HabitStatus::Failed(penalty);
                }
            }
        }
        Command::ResetHabit { id } => {
            if let Some(habit) = next.habit_mut(id) {
                habit.status = HabitStatus::Pending;
            }
        }
        Command::DeleteHabit { id } => next.habits.retain(|h| h.id != *id),

        Command::CreateQuest { name, difficulty } => {
            require_name(name)?;
            next.quests.push(Quest {
                id: new_id(),
                name: name.trim().to_string(),
                difficulty: *difficulty,
                completed: false,
            });
        }
        Command::EditQuest {
            id,
            name,
            difficulty,
        } => {
            require_name(name)?;
            if let Some(quest) = next.quest_mut(id) {
                quest.name = name.trim().to_string();
                quest.difficulty = *difficulty;
            }
        }
        Command::ToggleQuest { id } => {
            if let Some(quest) = next.quest_mut(id) {
                quest.completed = !quest.completed;
            }
        }
        Command::DeleteQuest { id } => next.quests.retain(|q| q.id != *id),

        Command::CreateGoal {
            name,
            total,
            unit,
            start_date,
            end_date,
        } => {
            require_name(name)?;
            require_positive(*total)?;
            next.goals.push(Goal {
                id: new_id(),
                name: name.trim().to_string(),
                total: *total,
                progress: 0.0,
                unit: unit.clone(),
                completed: false,
                start_date: *start_date,
                end_date: *end_date,
                notified_soon: false,
            });
        }
        Command::AdjustGoalProgress { id, delta } => {
            require_finite(*delta)?;
            if let Some(goal) = next.goal_mut(id) {
                // A snapshot can carry a non-positive total the creation
                // path never allows; such a goal is inert, not a panic
                // inside clamp.
                if !goal.total.is_finite() || goal.total <= 0.0 {
                    return Ok((next, notices));
                }
                let was_completed = goal.completed;
                goal.progress = (goal.progress + delta).clamp(0.0, goal.total);
                goal.completed = goal.progress >= goal.total;
                if goal.completed && !was_completed {
                    notices.push("🏹 Goal reached!".to_string());
                }
            }
        }
        Command::EditGoal {
            id,
            name,
            total,
            unit,
            start_date,
            end_date,
        } => {
            require_name(name)?;
            require_positive(*total)?;
            if let Some(goal) = next.goal_mut(id) {
                goal.name = name.trim().to_string();
                goal.total = *total;
                goal.unit = unit.clone();
                goal.start_date = *start_date;
                goal.end_date = *end_date;
                goal.completed = goal.progress >= goal.total;
            }
        }
        Command::ToggleGoal { id } => {
            if let Some(goal) = next.goal_mut(id) {
                goal.completed = !goal.completed;
            }
        }
        Command::DeleteGoal { id } => next.goals.retain(|g| g.id != *id),

        Command::CreateEvent {
            name,
            description,
            date,
            lead_days,
        } => {
            require_name(name)?;
            if *lead_days < 0 {
                return Err(CommandError::NegativeLeadTime);
            }
            next.events.push(ScheduledEvent {
                id: new_id(),
                name: name.trim().to_string(),
                description: description.clone(),
                date: *date,
                lead_days: *lead_days,
                status: EventStatus::Pending,
                notified_soon: false,
            });
        }
        Command::EditEvent {
            id,
            name,
            description,
            date,
            lead_days,
        } => {
            require_name(name)?;
            if *lead_days < 0 {
                return Err(CommandError::NegativeLeadTime);
            }
            if let Some(event) = next.event_mut(id) {
                event.name = name.trim().to_string();
                event.description = description.clone();
                // A new date restarts the reminder cycle.
                if event.date != *date {
                    event.notified_soon = false;
                }
                event.date = *date;
                event.lead_days = *lead_days;
            }
        }
        Command::ToggleEvent { id } => {
            if let Some(event) = next.event_mut(id) {
                event.status = match event.status {
                    EventStatus::Pending => EventStatus::Done,
                    EventStatus::Done => EventStatus::Pending,
                };
            }
        }
        Command::DeleteEvent { id } => next.events.retain(|e| e.id != *id),

        Command::CreateItem {
            name,
            description,
            cost,
            category,
            effect,
        } => {
            require_name(name)?;
            if *cost < 0 {
                return Err(CommandError::NegativeCost);
            }
            next.shop_items.push(ShopItem {
                id: new_id(),
                name: name.trim().to_string(),
                description: description.clone(),
                cost: *cost as u32,
                category: *category,
                effect: *effect,
            });
            notices.push("🔨 Item forged.".to_string());
        }
        Command::EditItem {
            id,
            name,
            description,
            cost,
            category,
        } => {
            require_name(name)?;
            if *cost < 0 {
                return Err(CommandError::NegativeCost);
            }
            if let Some(item) = next.shop_items.iter_mut().find(|i| i.id == *id) {
                item.name = name.trim().to_string();
                item.description = description.clone();
                item.cost = *cost as u32;
                item.category = *category;
            }
        }
        Command::DeleteItem { id } => next.shop_items.retain(|i| i.id != *id),

        Command::PurchaseItem { item_id } => {
            let Some(item) = next.shop_item(item_id).cloned() else {
                return Ok((next, notices));
            };
            let coins = current_coins(&next);
            if coins < item.cost as u64 {
                return Err(CommandError::InsufficientCoins {
                    need: item.cost as u64,
                    have: coins,
                });
            }
            next.purchases.push(Purchase {
                id: new_id(),
                item_id: item.id.clone(),
                price: item.cost,
                at: now,
            });
            next.inventory.push(InventoryEntry {
                id: new_id(),
                item_id: item.id.clone(),
            });
            notices.push(format!("✨ {} acquired!", item.name));
        }
        Command::UseItem { entry_id, target } => {
            let Some(entry) = next.inventory.iter().find(|e| e.id == *entry_id).cloned() else {
                return Ok((next, notices));
            };
            let Some(item) = next.shop_item(&entry.item_id).cloned() else {
                return Ok((next, notices));
            };
            match item.effect {
                Some(ItemEffect::TemporaryProtection) => {
                    // A second charge is a legal purchase but never stacks.
                    next.protection_active = true;
                }
                Some(ItemEffect::RemovePenalty) | Some(ItemEffect::ConvertPenaltyToXp) => {
                    let Some(target) = target else {
                        return Ok((next, notices));
                    };
                    if !resolve_active_penalty(&mut next, target) {
                        return Ok((next, notices));
                    }
                    if item.effect == Some(ItemEffect::ConvertPenaltyToXp) {
                        next.bonus_xp += CONVERT_PENALTY_BONUS_XP;
                    }
                }
                None => {}
            }
            next.inventory.retain(|e| e.id != *entry_id);
            notices.push(format!("✨ {} activated!", item.name));
        }

        Command::SetPenaltyResolved { target, resolved } => match target {
            PenaltyRef::Task(id) => {
                if let Some(task) = next.task_mut(id) {
                    match (task.state, resolved) {
                        (TaskState::Failed(PenaltyState::Outstanding), true) => {
                            task.state = TaskState::Failed(PenaltyState::Resolved);
                            notices.push("⚖️ Penance served. Honor restored.".to_string());
                        }
                        (TaskState::Failed(PenaltyState::Resolved), false) => {
                            task.state = TaskState::Failed(PenaltyState::Outstanding);
                        }
                        _ => {}
                    }
                }
            }
            PenaltyRef::Habit(id) => {
                if let Some(habit) = next.habit_mut(id) {
                    match (habit.status, resolved) {
                        (HabitStatus::Failed(PenaltyState::Outstanding), true) => {
                            habit.status = HabitStatus::Failed(PenaltyState::Resolved);
                            notices.push("⚖️ Penance served. Honor restored.".to_string());
                        }
                        (HabitStatus::Failed(PenaltyState::Resolved), false) => {
                            habit.status = HabitStatus::Failed(PenaltyState::Outstanding);
                        }
                        _ => {}
                    }
                }
            }
        },

        Command::SetClass { class_id } => {
            if let Some(id) = class_id {
                if find_class(id).is_none() {
                    return Err(CommandError::UnknownClass(id.clone()));
                }
            }
            next.class_id = class_id.clone();
        }
        Command::AcknowledgeReminder { target } => match target {
            ReminderTarget::Goal(id) => {
                if let Some(goal) = next.goal_mut(id) {
                    goal.notified_soon = true;
                }
            }
            ReminderTarget::Event(id) => {
                if let Some(event) = next.event_mut(id) {
                    event.notified_soon = true;
                }
            }
        },
        Command::SelectScreen { screen } => next.screen = *screen,
        Command::SelectMissionsTab { tab } => next.missions_tab = *tab,
    }

    Ok((next, notices))
}
