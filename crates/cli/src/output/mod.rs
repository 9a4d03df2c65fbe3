//! Output formatting for CLI results.

pub mod table;

pub use table::{
    print_assets_table, print_json, print_loading_notice, print_locations_table,
    print_rewards_table, print_yield_table,
};
