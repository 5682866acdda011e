// SPDX-FileCopyrightText: 2026 Farmsight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed per-entity schema registry for the generic reader.
//!
//! Column identifiers are only ever rendered into SQL text after passing
//! through this registry; filter and sort values are always bound parameters.
//! The registry must stay in lockstep with the migration SQL.

/// A readable entity: its table name and the full ordered column set.
#[derive(Debug)]
pub struct EntitySchema {
    pub table: &'static str,
    pub columns: &'static [&'static str],
}

impl EntitySchema {
    /// True when `name` is a declared column of this entity.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains(&name)
    }
}

/// Entities exposed through the generic reader.
pub const ENTITIES: &[EntitySchema] = &[
    EntitySchema {
        table: "events",
        columns: &[
            "id",
            "event_name",
            "event_type",
            "event_level",
            "event_container_alias",
            "event_container_id",
            "event_container_type",
            "event_data",
            "event_datetime",
            "created_at",
        ],
    },
    EntitySchema {
        table: "containers",
        columns: &[
            "container_id",
            "container_type",
            "container_alias",
            "container_status",
            "container_image",
            "container_started_at",
            "container_is_cluster",
            "container_nats_url",
            "container_ip",
            "created_at",
        ],
    },
    EntitySchema {
        table: "farmers",
        columns: &[
            "farmer_id",
            "container_id",
            "farmer_status",
            "farmer_reward_address",
            "created_at",
        ],
    },
    EntitySchema {
        table: "farms",
        columns: &[
            "id",
            "farmer_id",
            "farm_index",
            "farm_id",
            "farm_public_key",
            "farm_genesis_hash",
            "farm_size",
            "farm_directory",
            "farm_fastest_mode",
            "farm_initial_plot_complete",
            "farm_plot_progress",
            "farm_latest_sector",
            "created_at",
        ],
    },
    EntitySchema {
        table: "sectors",
        columns: &[
            "id",
            "sector_index",
            "public_key",
            "complete",
            "farmer_id",
            "plotter_id",
            "started_at",
            "finished_at",
            "plot_time_seconds",
            "created_at",
        ],
    },
];

/// Look up the schema for a whitelisted entity name, `None` for anything else.
pub fn entity_schema(entity: &str) -> Option<&'static EntitySchema> {
    ENTITIES.iter().find(|e| e.table == entity)
}
