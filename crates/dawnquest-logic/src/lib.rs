//! Pure progression and economy rules for DawnQuest.
//!
//! This crate contains all game rules that are independent of any storage,
//! runtime, or presentation layer. Functions take plain data and return
//! results, making them unit-testable and portable — the engine crate owns
//! the mutable state document and calls in here for every derivation.
//!
//! Every derived value (attributes, XP, coins, penalty ledger, reminders)
//! is recomputed from scratch from the full entity history on each call.
//! Nothing in this crate accumulates state, which makes derivations
//! idempotent and immune to replay bugs.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`attributes`] | Attribute experience weights and leveled attribute values |
//! | [`class`] | Attribute set, hero classes, and favored-attribute bonuses |
//! | [`difficulty`] | Five-tier difficulty table with reward multipliers |
//! | [`economy`] | Base reward values, difficulty scaling, failure fines |
//! | [`events`] | Scheduled events with per-event reminder lead times |
//! | [`goals`] | Long-horizon goals with numeric progress and deadlines |
//! | [`habits`] | Bad habits tracked by daily resistance status |
//! | [`penalties`] | Active/resolved penalty ledger over failure states |
//! | [`progression`] | Total XP, hero level, and spendable coin balance |
//! | [`quests`] | One-off quests with a reopenable completion toggle |
//! | [`reminders`] | Date-only deadline scan for goals and events |
//! | [`shop`] | Shop items, purchases, and consumable inventory entries |
//! | [`tasks`] | Daily tasks with an explicit lifecycle state machine |

pub mod attributes;
pub mod class;
pub mod difficulty;
pub mod economy;
pub mod events;
pub mod goals;
pub mod habits;
pub mod penalties;
pub mod progression;
pub mod quests;
pub mod reminders;
pub mod shop;
pub mod tasks;
