use super::{CodecError, CodecResult, FORMAT_VERSION};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use mapnote_model::{Account, AccountRef, Building, Floor, FloorRef, Poi, Snapshot};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Output options for [`encode`].
#[derive(Debug, Clone, Copy)]
pub struct EncodeOptions {
    /// Indent the document for humans instead of writing it on one line.
    pub pretty: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self { pretty: true }
    }
}

/// Encode a snapshot as a JSON document.
///
/// Every account and floor allocation is written in full exactly once, at its
/// first occurrence; later occurrences are bare reference numbers.
pub fn encode(snapshot: &Snapshot, options: EncodeOptions) -> CodecResult<String> {
    let document = Encoder::default().document(snapshot);
    let text = if options.pretty {
        serde_json::to_string_pretty(&document)
    } else {
        serde_json::to_string(&document)
    };
    text.map_err(CodecError::Encode)
}

#[derive(Serialize)]
struct WireDocument<'a> {
    version: u64,
    accounts: Vec<Node<WireAccount<'a>>>,
    buildings: Vec<WireBuilding<'a>>,
    pois: Vec<WirePoi<'a>>,
}

/// An entity occurrence: a bare number or a full definition.
#[derive(Serialize)]
#[serde(untagged)]
enum Node<T> {
    Ref(u32),
    Def(T),
}

#[derive(Serialize)]
struct WireAccount<'a> {
    #[serde(rename = "ref")]
    number: u32,
    username: &'a str,
    password_hash: String,
    developer: bool,
}

#[derive(Serialize)]
struct WireFloor<'a> {
    #[serde(rename = "ref")]
    number: u32,
    short_name: &'a str,
    long_name: &'a str,
    map_path: &'a str,
}

#[derive(Serialize)]
struct WireBuilding<'a> {
    name: &'a str,
    floors: Vec<Node<WireFloor<'a>>>,
}

#[derive(Serialize)]
struct WirePoi<'a> {
    name: &'a str,
    description: &'a str,
    x: i32,
    y: i32,
    favorite_of: Vec<Node<WireAccount<'a>>>,
    floor: Node<WireFloor<'a>>,
    layer: &'static str,
    restricted_to: Option<Node<WireAccount<'a>>>,
}

/// Numbers accounts and floors by allocation in one shared space.
#[derive(Default)]
struct Encoder {
    last: u32,
    accounts: HashMap<*const Account, u32>,
    floors: HashMap<*const Floor, u32>,
}

impl Encoder {
    fn document<'a>(mut self, snapshot: &'a Snapshot) -> WireDocument<'a> {
        let accounts = snapshot.accounts().iter().map(|a| self.account(a)).collect();
        let buildings = snapshot
            .buildings()
            .iter()
            .map(|b| self.building(b))
            .collect();
        let pois = snapshot.pois().iter().map(|p| self.poi(p)).collect();
        WireDocument {
            version: FORMAT_VERSION,
            accounts,
            buildings,
            pois,
        }
    }

    fn next_number(&mut self) -> u32 {
        self.last += 1;
        self.last
    }

    fn account<'a>(&mut self, account: &'a AccountRef) -> Node<WireAccount<'a>> {
        let key = Arc::as_ptr(account);
        if let Some(&number) = self.accounts.get(&key) {
            return Node::Ref(number);
        }
        let number = self.next_number();
        self.accounts.insert(key, number);
        Node::Def(WireAccount {
            number,
            username: account.username(),
            password_hash: STANDARD.encode(account.password_hash()),
            developer: account.is_developer(),
        })
    }

    fn floor<'a>(&mut self, floor: &'a FloorRef) -> Node<WireFloor<'a>> {
        let key = Arc::as_ptr(floor);
        if let Some(&number) = self.floors.get(&key) {
            return Node::Ref(number);
        }
        let number = self.next_number();
        self.floors.insert(key, number);
        Node::Def(WireFloor {
            number,
            short_name: floor.short_name(),
            long_name: floor.long_name(),
            map_path: floor.map_path(),
        })
    }

    fn building<'a>(&mut self, building: &'a Building) -> WireBuilding<'a> {
        WireBuilding {
            name: building.name(),
            floors: building.floors().iter().map(|f| self.floor(f)).collect(),
        }
    }

    fn poi<'a>(&mut self, poi: &'a Poi) -> WirePoi<'a> {
        let favorite_of = poi.favorite_of().iter().map(|a| self.account(a)).collect();
        let floor = self.floor(poi.floor());
        let restricted_to = poi.restricted_to().map(|a| self.account(a));
        WirePoi {
            name: poi.name(),
            description: poi.description(),
            x: poi.x(),
            y: poi.y(),
            favorite_of,
            floor,
            layer: poi.layer().as_str(),
            restricted_to,
        }
    }
}
