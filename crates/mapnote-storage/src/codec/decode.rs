use super::strict::StrictValue;
use super::{CodecError, CodecResult, IdentityError, FORMAT_VERSION};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use mapnote_model::{
    Account, AccountRef, Building, FavoriteSet, Floor, FloorRef, Layer, Poi, Snapshot,
};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

const DOCUMENT_FIELDS: &[&str] = &["version", "accounts", "buildings", "pois"];
const ACCOUNT_FIELDS: &[&str] = &["ref", "username", "password_hash", "developer"];
const FLOOR_FIELDS: &[&str] = &["ref", "short_name", "long_name", "map_path"];
const BUILDING_FIELDS: &[&str] = &["name", "floors"];
const POI_FIELDS: &[&str] = &[
    "name",
    "description",
    "x",
    "y",
    "favorite_of",
    "floor",
    "layer",
    "restricted_to",
];

/// Decode a JSON document into a snapshot.
///
/// Reference numbers are resolved in the order the encoder assigns them, so a
/// bare number must follow its definition. The result is checked against the
/// snapshot invariants before it is returned; nothing is repaired.
pub fn decode(text: &str) -> CodecResult<Snapshot> {
    decode_slice(text.as_bytes())
}

/// Decode a document from raw bytes. Bytes that are not UTF-8 are a syntax
/// error, like any other malformed JSON.
pub fn decode_slice(bytes: &[u8]) -> CodecResult<Snapshot> {
    let StrictValue(root) = serde_json::from_slice(bytes).map_err(CodecError::Syntax)?;
    let snapshot = Decoder::default().document(&root)?;
    snapshot.validate()?;
    Ok(snapshot)
}

enum Entry {
    Account(AccountRef),
    Floor(FloorRef),
}

impl Entry {
    fn kind(&self) -> &'static str {
        match self {
            Entry::Account(_) => "an account",
            Entry::Floor(_) => "a floor",
        }
    }
}

#[derive(Default)]
struct Decoder {
    table: HashMap<u32, Entry>,
}

impl Decoder {
    fn document(&mut self, root: &Value) -> CodecResult<Snapshot> {
        let fields = Fields::new("document", "top level", root, DOCUMENT_FIELDS)?;

        let version = fields.get("version")?;
        if version.as_u64() != Some(FORMAT_VERSION) {
            return Err(fields.error(
                "version",
                format!("unsupported version {version}, expected {FORMAT_VERSION}"),
            ));
        }

        let mut accounts = Vec::new();
        for (i, value) in fields.array("accounts")?.iter().enumerate() {
            accounts.push(self.account(value, format!("accounts[{i}]"))?);
        }

        let mut buildings = Vec::new();
        for (i, value) in fields.array("buildings")?.iter().enumerate() {
            buildings.push(Arc::new(self.building(value, format!("buildings[{i}]"))?));
        }

        let mut pois = Vec::new();
        for (i, value) in fields.array("pois")?.iter().enumerate() {
            pois.push(Arc::new(self.poi(value, format!("pois[{i}]"))?));
        }

        Ok(Snapshot::new(accounts, buildings, pois))
    }

    fn account(&mut self, value: &Value, at: String) -> CodecResult<AccountRef> {
        if !value.is_object() {
            let number = reference_number(value, "account", &at, None)?;
            return match self.resolve(number, &at)? {
                Entry::Account(account) => Ok(Arc::clone(account)),
                other => Err(wrong_kind(number, at, "an account", other)),
            };
        }

        let fields = Fields::new("account", &at, value, ACCOUNT_FIELDS)?;
        let number = fields.reference("ref")?;
        let account = Account::new(
            fields.string("username")?,
            fields.base64("password_hash")?,
            fields.boolean("developer")?,
        )
        .shared();
        self.define(number, Entry::Account(Arc::clone(&account)), at)?;
        Ok(account)
    }

    fn floor(&mut self, value: &Value, at: String) -> CodecResult<FloorRef> {
        if !value.is_object() {
            let number = reference_number(value, "floor", &at, None)?;
            return match self.resolve(number, &at)? {
                Entry::Floor(floor) => Ok(Arc::clone(floor)),
                other => Err(wrong_kind(number, at, "a floor", other)),
            };
        }

        let fields = Fields::new("floor", &at, value, FLOOR_FIELDS)?;
        let number = fields.reference("ref")?;
        let floor = Floor::new(
            fields.string("short_name")?,
            fields.string("long_name")?,
            fields.string("map_path")?,
        )
        .shared();
        self.define(number, Entry::Floor(Arc::clone(&floor)), at)?;
        Ok(floor)
    }

    fn building(&mut self, value: &Value, at: String) -> CodecResult<Building> {
        let fields = Fields::new("building", &at, value, BUILDING_FIELDS)?;
        let name = fields.string("name")?;
        let mut floors = Vec::new();
        for (j, value) in fields.array("floors")?.iter().enumerate() {
            floors.push(self.floor(value, format!("{at}.floors[{j}]"))?);
        }
        Ok(Building::new(name, floors))
    }

    fn poi(&mut self, value: &Value, at: String) -> CodecResult<Poi> {
        let fields = Fields::new("poi", &at, value, POI_FIELDS)?;
        let name = fields.string("name")?;
        let description = fields.string("description")?;
        let x = fields.int("x")?;
        let y = fields.int("y")?;

        let mut favorites = Vec::new();
        let mut seen = HashSet::new();
        for (j, value) in fields.array("favorite_of")?.iter().enumerate() {
            let account = self.account(value, format!("{at}.favorite_of[{j}]"))?;
            if !seen.insert(Arc::as_ptr(&account)) {
                return Err(fields.error(
                    "favorite_of",
                    format!("account \"{}\" is listed twice", account.username()),
                ));
            }
            favorites.push(account);
        }

        let floor = self.floor(fields.get("floor")?, format!("{at}.floor"))?;
        let layer = fields.layer("layer")?;
        let restricted_to = match fields.optional("restricted_to") {
            Some(value) => Some(self.account(value, format!("{at}.restricted_to"))?),
            None => None,
        };

        Ok(Poi::new(name, description, x, y, floor, layer)
            .with_favorites(favorites.into_iter().collect::<FavoriteSet>())
            .with_restricted_to(restricted_to))
    }

    fn define(&mut self, number: u32, entry: Entry, at: String) -> CodecResult<()> {
        if self.table.contains_key(&number) {
            return Err(IdentityError::Ambiguous { number, at }.into());
        }
        self.table.insert(number, entry);
        Ok(())
    }

    fn resolve(&self, number: u32, at: &str) -> CodecResult<&Entry> {
        self.table.get(&number).ok_or_else(|| {
            IdentityError::Dangling {
                number,
                at: at.to_string(),
            }
            .into()
        })
    }
}

fn wrong_kind(number: u32, at: String, expected: &'static str, found: &Entry) -> CodecError {
    IdentityError::WrongKind {
        number,
        at,
        expected,
        found: found.kind(),
    }
    .into()
}

fn reference_number(
    value: &Value,
    entity: &'static str,
    at: &str,
    field: Option<&'static str>,
) -> CodecResult<u32> {
    match value.as_u64() {
        Some(0) => Err(IdentityError::Zero { at: at.to_string() }.into()),
        Some(n) => u32::try_from(n).map_err(|_| {
            CodecError::parse(entity, at, field, format!("reference number {n} is out of range"))
        }),
        None => Err(CodecError::parse(
            entity,
            at,
            field,
            format!(
                "expected an object or a positive reference number, found {}",
                describe(value)
            ),
        )),
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Typed access to one JSON object, with errors that say where it sits.
struct Fields<'v> {
    entity: &'static str,
    at: String,
    map: &'v Map<String, Value>,
}

impl<'v> Fields<'v> {
    fn new(
        entity: &'static str,
        at: &str,
        value: &'v Value,
        allowed: &[&str],
    ) -> CodecResult<Self> {
        let Some(map) = value.as_object() else {
            return Err(CodecError::parse(
                entity,
                at,
                None,
                format!("expected an object, found {}", describe(value)),
            ));
        };
        if let Some(unknown) = map.keys().find(|key| !allowed.contains(&key.as_str())) {
            return Err(CodecError::parse(
                entity,
                at,
                None,
                format!("unknown field `{unknown}`"),
            ));
        }
        Ok(Self {
            entity,
            at: at.to_string(),
            map,
        })
    }

    fn error(&self, field: &'static str, message: impl Into<String>) -> CodecError {
        CodecError::parse(self.entity, self.at.clone(), Some(field), message)
    }

    fn mistyped(&self, field: &'static str, expected: &str, value: &Value) -> CodecError {
        self.error(field, format!("expected {expected}, found {}", describe(value)))
    }

    fn get(&self, field: &'static str) -> CodecResult<&'v Value> {
        self.map
            .get(field)
            .ok_or_else(|| self.error(field, "missing field"))
    }

    /// An absent field and an explicit `null` both mean "not set".
    fn optional(&self, field: &'static str) -> Option<&'v Value> {
        self.map.get(field).filter(|value| !value.is_null())
    }

    fn string(&self, field: &'static str) -> CodecResult<&'v str> {
        let value = self.get(field)?;
        value
            .as_str()
            .ok_or_else(|| self.mistyped(field, "a string", value))
    }

    fn boolean(&self, field: &'static str) -> CodecResult<bool> {
        let value = self.get(field)?;
        value
            .as_bool()
            .ok_or_else(|| self.mistyped(field, "a boolean", value))
    }

    fn int(&self, field: &'static str) -> CodecResult<i32> {
        let value = self.get(field)?;
        value
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .ok_or_else(|| self.mistyped(field, "a 32-bit integer", value))
    }

    fn array(&self, field: &'static str) -> CodecResult<&'v [Value]> {
        let value = self.get(field)?;
        value
            .as_array()
            .map(Vec::as_slice)
            .ok_or_else(|| self.mistyped(field, "an array", value))
    }

    fn reference(&self, field: &'static str) -> CodecResult<u32> {
        reference_number(self.get(field)?, self.entity, &self.at, Some(field))
    }

    fn base64(&self, field: &'static str) -> CodecResult<Vec<u8>> {
        STANDARD
            .decode(self.string(field)?)
            .map_err(|e| self.error(field, format!("invalid base64: {e}")))
    }

    fn layer(&self, field: &'static str) -> CodecResult<Layer> {
        self.string(field)?
            .parse::<Layer>()
            .map_err(|e| self.error(field, e.to_string()))
    }
}
