//! 설정 문서 모델.
//!
//! 편집 대상인 샵 플러그인 설정 전체를 중첩 JSON 트리로 보관한다.
//! 최상위 섹션 구성은 고정이며, 패치 적용은 최상위 키 단위의 얕은 병합이다.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::{CoreError, CoreResult};

/// 문서가 항상 보유해야 하는 최상위 섹션
pub const SECTIONS: [&str; 6] = [
    "Mysql",
    "General",
    "Kits",
    "ShopItems",
    "SellItems",
    "Messages",
];

/// 기본 문서 (세션 시작/언로드 시 복귀 지점)
static DEFAULT_DOCUMENT: Lazy<ConfigDocument> = Lazy::new(|| {
    let value = json!({
        "Mysql": {
            "UseMysql": false,
            "MysqlHost": "",
            "MysqlUser": "",
            "MysqlPass": "",
            "MysqlDB": "",
            "MysqlPort": 3306,
        },
        "General": {
            "Discord": {
                "Enabled": false,
                "SenderName": "ArkShop",
                "URL": "",
            },
            "TimedPointsReward": {
                "Enabled": false,
                "StackRewards": false,
                "Interval": 30,
                "Groups": {},
            },
            "ItemsPerPage": 15,
            "ShopDisplayTime": 15.0,
            "ShopTextSize": 1.3,
            "DbPathOverride": "",
            "DefaultKit": "",
            "GiveDinosInCryopods": true,
            "UseSoulTraps": false,
            "CryoLimitedTime": false,
            "CryoItemPath": "",
            "UseOriginalTradeCommandWithUI": false,
            "PreventUseNoglin": true,
            "PreventUseUnconscious": true,
            "PreventUseHandcuffed": true,
            "PreventUseCarried": true,
        },
        "Kits": {},
        "ShopItems": {},
        "SellItems": {},
        "Messages": {
            "Sender": "ArkShop",
            "BoughtItem": "<RichColor Color=\"0, 1, 0, 1\">You have successfully bought item</>",
            "BoughtDino": "<RichColor Color=\"0, 1, 0, 1\">You have successfully bought dino</>",
            "BoughtBeacon": "<RichColor Color=\"0, 1, 0, 1\">You have successfully bought beacon</>",
            "BoughtExp": "<RichColor Color=\"0, 1, 0, 1\">You have successfully bought experience</>",
            "ReceivedPoints": "<RichColor Color=\"1, 1, 0, 1\">You have received {0} points! (total: {1})</>",
            "HavePoints": "You have {0} points",
            "NoPoints": "<RichColor Color=\"1, 0, 0, 1\">You don't have enough points</>",
            "WrongId": "<RichColor Color=\"1, 0, 0, 1\">Wrong id</>",
            "NoPermissionsKit": "<RichColor Color=\"1, 0, 0, 1\">You don't have permission to use this kit</>",
            "CantBuyKit": "<RichColor Color=\"1, 0, 0, 1\">You can't buy this kit</>",
            "BoughtKit": "<RichColor Color=\"0, 1, 0, 1\">You have successfully bought {0} kit</>",
            "AvailableKits": "Available kits for you:",
            "NoKits": "No available kits",
            "KitsLeft": "You have {0} {1} kits left",
            "NoKitsLeft": "You don't have {0} kits left",
            "CantGivePoints": "<RichColor Color=\"1, 0, 0, 1\">You can't give points to yourself</>",
            "RidingDino": "<RichColor Color=\"1, 0, 0, 1\">You can't buy this item while riding a dino</>",
            "SentPoints": "<RichColor Color=\"0, 1, 0, 1\">You have successfully sent {0} points to {1}</>",
            "GotPoints": "You have received {0} points from {1}",
            "NoPlayer": "<RichColor Color=\"1, 0, 0, 1\">Player doesn't exist</>",
            "FoundMorePlayers": "<RichColor Color=\"1, 0, 0, 1\">Found more than one player with the given name</>",
            "BuyUsage": "Usage: /buy id amount",
            "ShopUsage": "Usage: /shop page",
            "KitUsage": "Usage: /kit KitName",
            "BuyKitUsage": "Usage: /BuyKit KitName amount",
            "TradeUsage": "Usage: /trade 'Player Name' amount",
            "PointsCmd": "/points",
            "TradeCmd": "/trade",
            "BuyCmd": "/buy",
            "ShopCmd": "/shop",
            "KitCmd": "/kit",
            "BuyKitCmd": "/buykit",
            "SellCmd": "/sell",
            "ShopSellCmd": "/shopsell",
            "SellUsage": "Usage: /sell id amount",
            "NotEnoughItems": "<RichColor Color=\"1, 0, 0, 1\">You don't have enough items ({0}/{1})</>",
            "SoldItems": "<RichColor Color=\"0, 1, 0, 1\">You have successfully sold items</>",
            "BadLevel": "<RichColor Color=\"1, 0, 0, 1\">Required level: {0} - {1}</>",
            "KitsListPrice": "Price: {0}",
            "KitsListFormat": "\"{0}\" - {1}. {2} left. {3}\n",
            "StoreListDino": "{0}) {1}. Level: {2}. Id: {3}. Price: {4}\n",
            "StoreListItem": "{0}) {1}. Id: {2}. Price: {3}\n",
            "StoreListFormat": "{0}",
            "OnlyOnSpawnKit": "This kit can be used only on spawn",
            "HelpCmd": "/shophelp",
            "ShopMessage": "Usage: /buy id amount",
            "HelpMessage": "This is shop help message",
            "RefundError": "Points refunded due to an error",
            "ShopFindCmd": "/shopfind",
            "ShopFindUsage": "Usage: /shopfind searchterm",
            "ShopFindNotFound": "No items matched your search",
            "ShopFindTooManyResults": "Too many results to display refine your search term",
            "NoPermissionsStore": "<RichColor Color=\"1, 0, 0, 1\">You don't have permission to buy this {0}!</>",
            "InventoryIsFull": "<RichColor Color=\"1, 0, 0, 1\">Unable to redeem your kit, inventory full!</>",
        },
    });
    match value {
        Value::Object(root) => ConfigDocument { root },
        _ => unreachable!("기본 문서 리터럴은 항상 객체"),
    }
});

/// 편집 중인 설정 문서.
///
/// 최상위는 섹션명 → 값 매핑이며, [`SECTIONS`]의 섹션을 항상 포함한다.
/// 스토어가 부분 문서를 들고 있는 일은 없다 — 파싱/임포트 시
/// 기본 문서 위에 덮어써서 누락 섹션을 보충한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigDocument {
    root: Map<String, Value>,
}

impl ConfigDocument {
    /// 직렬화된 문서 파싱 + 정규화
    ///
    /// JSON이 아니면 [`CoreError::Parse`], 최상위가 객체가 아니면
    /// [`CoreError::Document`].
    pub fn parse(serialized: &str) -> CoreResult<Self> {
        let value: Value = serde_json::from_str(serialized)?;
        Self::from_value(value)
    }

    /// JSON 값에서 문서 생성 + 정규화
    pub fn from_value(value: Value) -> CoreResult<Self> {
        match value {
            Value::Object(map) => Ok(Self::normalized(map)),
            other => Err(CoreError::Document(format!(
                "최상위가 객체가 아님: {}",
                json_type_name(&other)
            ))),
        }
    }

    /// 기본 문서 위에 주어진 맵을 덮어써 고정 섹션 구성을 보장
    ///
    /// 제공된 섹션은 통째로 교체되고, 누락 섹션은 기본값으로 보충된다.
    /// 알 수 없는 최상위 키는 그대로 보존한다.
    fn normalized(map: Map<String, Value>) -> Self {
        let mut root = DEFAULT_DOCUMENT.root.clone();
        for (key, value) in map {
            root.insert(key, value);
        }
        Self { root }
    }

    /// 패치 적용 — 최상위 키 단위 얕은 병합.
    ///
    /// 패치에 있는 섹션은 이전 값을 통째로 대체한다. 하위 트리 재귀 병합은
    /// 하지 않으므로, 한 필드만 바꾸려는 호출자는 기존 섹션을 펼쳐서
    /// 패치를 구성할 책임이 있다. 이것은 문서화된 계약이다.
    pub fn apply(&mut self, patch: DocumentPatch) {
        for (key, value) in patch.sections {
            self.root.insert(key, value);
        }
    }

    /// 섹션 조회
    pub fn section(&self, name: &str) -> Option<&Value> {
        self.root.get(name)
    }

    /// 최상위 매핑 참조
    pub fn root(&self) -> &Map<String, Value> {
        &self.root
    }

    /// JSON 값으로 변환 (복제본)
    pub fn to_value(&self) -> Value {
        Value::Object(self.root.clone())
    }
}

impl Default for ConfigDocument {
    fn default() -> Self {
        DEFAULT_DOCUMENT.clone()
    }
}

/// 문서 패치 — 교체할 최상위 섹션의 집합.
#[derive(Debug, Clone, Default)]
pub struct DocumentPatch {
    sections: Map<String, Value>,
}

impl DocumentPatch {
    /// 빈 패치 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 섹션 추가 (빌더)
    pub fn with_section(mut self, name: impl Into<String>, value: Value) -> Self {
        self.sections.insert(name.into(), value);
        self
    }

    /// JSON 객체에서 패치 생성
    pub fn from_value(value: Value) -> CoreResult<Self> {
        match value {
            Value::Object(sections) => Ok(Self { sections }),
            other => Err(CoreError::Document(format!(
                "패치는 객체여야 함: {}",
                json_type_name(&other)
            ))),
        }
    }

    /// 패치가 비어 있는지
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// 패치가 건드리는 섹션명
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }
}

/// JSON 값 종류 이름 (에러 메시지용)
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "불리언",
        Value::Number(_) => "숫자",
        Value::String(_) => "문자열",
        Value::Array(_) => "배열",
        Value::Object(_) => "객체",
    }
}
