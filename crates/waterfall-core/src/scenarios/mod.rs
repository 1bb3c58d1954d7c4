pub mod generation;

pub use generation::{
    exit_scenarios_for, generate_scenarios, total_invested_capital, ScenarioInput,
    DEFAULT_EXIT_MULTIPLES,
};
