//! Mutation resource
//!
//! Model, wire shapes and the converter that plugs mutations into the
//! generic [`CrudClient`].

use crate::api::{ApiResult, CrudClient, ResourceConverter, Transport};
use crate::modifiers::Modifiers;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// REST path of the mutation resource
pub const MUTATION_BASE_PATH: &str = "/api/mutation";

/// Placeholder name given to freshly created mutations
pub const NEW_MUTATION_NAME: &str = "New mutation";

/// Kind of mutation, keyed by integer on the wire.
///
/// Keys this client does not know are kept in `Unknown` so the element still
/// loads and the key is sent back untouched on update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum MutationType {
    #[default]
    Physical,
    Mental,
    Unknown(i64),
}

impl MutationType {
    pub const ALL: [MutationType; 2] = [MutationType::Physical, MutationType::Mental];

    pub fn from_key(key: i64) -> Self {
        match key {
            0 => MutationType::Physical,
            1 => MutationType::Mental,
            other => MutationType::Unknown(other),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MutationType::Physical => "Physical",
            MutationType::Mental => "Mental",
            MutationType::Unknown(_) => "Unknown",
        }
    }

    pub fn key(self) -> i64 {
        match self {
            MutationType::Physical => 0,
            MutationType::Mental => 1,
            MutationType::Unknown(key) => key,
        }
    }

    pub fn is_known(self) -> bool {
        !matches!(self, MutationType::Unknown(_))
    }
}

impl fmt::Display for MutationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MutationType::Unknown(key) => write!(f, "Unknown ({})", key),
            known => f.write_str(known.label()),
        }
    }
}

/// Accepts either the label (case-insensitive) or the integer key of a known type
impl FromStr for MutationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = match s.parse::<i64>() {
            Ok(key) => Some(MutationType::from_key(key)),
            Err(_) => MutationType::ALL
                .into_iter()
                .find(|t| t.label().eq_ignore_ascii_case(s)),
        };
        parsed
            .filter(|t| t.is_known())
            .ok_or_else(|| format!("unknown mutation type: {}", s))
    }
}

/// Client-side mutation
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Mutation {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub mutation_type: MutationType,
    /// Derived from `modifiers` when read from the server, never sent back
    pub has_modifiers: bool,
    pub modifiers: Modifiers,
    pub can_edit: bool,
    pub shared: bool,
}

impl Mutation {
    /// Unsaved mutation with every field at its zero value
    pub fn empty() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            description: String::new(),
            mutation_type: MutationType::Physical,
            has_modifiers: false,
            modifiers: Modifiers::empty(),
            can_edit: false,
            shared: false,
        }
    }

    /// Template for a mutation the user is about to create.
    /// New mutations are shared by default.
    pub fn new(can_edit: bool) -> Self {
        Self {
            name: NEW_MUTATION_NAME.to_string(),
            can_edit,
            shared: true,
            ..Self::empty()
        }
    }
}

/// Compare two mutations by value.
///
/// Plain fields must match exactly; modifiers are compared with
/// [`Modifiers::equals`].
pub fn compare_mutation(a: &Mutation, b: &Mutation) -> bool {
    a.id == b.id
        && a.name == b.name
        && a.description == b.description
        && a.mutation_type == b.mutation_type
        && a.has_modifiers == b.has_modifiers
        && a.can_edit == b.can_edit
        && a.shared == b.shared
        && a.modifiers.equals(&b.modifiers)
}

/// Mutation as returned by the server
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MutationData {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub mutation_type: i64,
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(default)]
    pub can_edit: bool,
    #[serde(default)]
    pub shared: bool,
}

/// Mutation as sent on create/update
#[derive(Debug, Clone, Serialize)]
pub struct MutationPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub mutation_type: i64,
    pub modifiers: Modifiers,
    pub shared: bool,
}

pub struct MutationConverter;

impl ResourceConverter for MutationConverter {
    type Wire = MutationData;
    type Payload = MutationPayload;
    type Model = Mutation;

    fn to_model(wire: MutationData) -> ApiResult<Mutation> {
        Ok(Mutation {
            mutation_type: MutationType::from_key(wire.mutation_type),
            has_modifiers: wire.modifiers.has_modifiers(),
            id: wire.id,
            name: wire.name,
            description: wire.description,
            modifiers: wire.modifiers,
            can_edit: wire.can_edit,
            shared: wire.shared,
        })
    }

    fn to_payload(mutation: &Mutation, include_id: bool) -> MutationPayload {
        MutationPayload {
            id: include_id.then(|| mutation.id.clone()),
            name: mutation.name.clone(),
            description: mutation.description.clone(),
            mutation_type: mutation.mutation_type.key(),
            modifiers: mutation.modifiers,
            shared: mutation.shared,
        }
    }

    fn id(mutation: &Mutation) -> &str {
        &mutation.id
    }
}

/// CRUD access to `/api/mutation`
pub struct MutationApi<T> {
    client: CrudClient<T, MutationConverter>,
}

impl<T: Clone> Clone for MutationApi<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
        }
    }
}

impl<T: Transport> MutationApi<T> {
    pub fn new(transport: T) -> Self {
        Self {
            client: CrudClient::new(MUTATION_BASE_PATH, transport),
        }
    }

    pub async fn get(&self, id: &str) -> ApiResult<Mutation> {
        self.client.get(id).await
    }

    pub async fn list(&self) -> ApiResult<Vec<Mutation>> {
        self.client.list().await
    }

    pub async fn create(&self, mutation: &Mutation) -> ApiResult<Mutation> {
        self.client.create(mutation).await
    }

    pub async fn update(&self, mutation: &Mutation) -> ApiResult<Mutation> {
        self.client.update(mutation).await
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        self.client.delete(id).await
    }
}
