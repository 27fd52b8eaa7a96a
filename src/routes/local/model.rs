use serde::{Deserialize, Serialize};

/// Most results `/api/search` returns.
pub const MAX_SEARCH_RESULTS: usize = 20;

/// Built-in demo place, compiled into the binary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Place {
    pub id: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub image: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<&'static str>,
}

impl Place {
    fn haystack(&self) -> String {
        format!(
            "{}{}{}",
            self.name,
            self.category,
            self.address.unwrap_or_default()
        )
        .to_lowercase()
    }
}

pub static PLACES: &[Place] = &[
    Place {
        id: "p1",
        name: "하마 카페 성수",
        category: "카페",
        image: "/images/places/hama-cafe.jpg",
        address: Some("서울 성동구 연무장길 12"),
    },
    Place {
        id: "p2",
        name: "블루보틀 삼청",
        category: "카페",
        image: "/images/places/bluebottle.jpg",
        address: Some("서울 종로구 북촌로5길 76"),
    },
    Place {
        id: "p3",
        name: "을지로 노가리 골목",
        category: "술집",
        image: "/images/places/nogari.jpg",
        address: Some("서울 중구 을지로13길"),
    },
    Place {
        id: "p4",
        name: "연남 파스타 하우스",
        category: "양식",
        image: "/images/places/pasta.jpg",
        address: Some("서울 마포구 동교로 241"),
    },
    Place {
        id: "p5",
        name: "망원 한강공원",
        category: "공원",
        image: "/images/places/mangwon.jpg",
        address: Some("서울 마포구 마포나루길 467"),
    },
    Place {
        id: "p6",
        name: "익선동 한옥 카페",
        category: "카페",
        image: "/images/places/ikseon.jpg",
        address: Some("서울 종로구 수표로28길"),
    },
    Place {
        id: "p7",
        name: "Brooklyn Burger",
        category: "양식",
        image: "/images/places/burger.jpg",
        address: Some("서울 서초구 서래로 5"),
    },
    Place {
        id: "p8",
        name: "광장시장 빈대떡",
        category: "한식",
        image: "/images/places/bindaetteok.jpg",
        address: Some("서울 종로구 창경궁로 88"),
    },
    Place {
        id: "p9",
        name: "해운대 북카페",
        category: "카페",
        image: "/images/places/bookcafe.jpg",
        address: Some("부산 해운대구 구남로 24"),
    },
    Place {
        id: "p10",
        name: "서촌 스시",
        category: "일식",
        image: "/images/places/sushi.jpg",
        address: None,
    },
    Place {
        id: "p11",
        name: "뚝섬 보드게임 라운지",
        category: "놀거리",
        image: "/images/places/boardgame.jpg",
        address: Some("서울 광진구 자양로 9"),
    },
    Place {
        id: "p12",
        name: "전포 카페거리 디저트",
        category: "디저트",
        image: "/images/places/jeonpo.jpg",
        address: Some("부산 부산진구 전포대로 209"),
    },
];

/// Case-insensitive substring match over name, category and address
/// joined with no separator.
///
/// A blank query matches nothing rather than everything.
pub fn search_places<'a>(places: &'a [Place], query: &str, limit: usize) -> Vec<&'a Place> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    places
        .iter()
        .filter(|p| p.haystack().contains(&needle))
        .take(limit)
        .collect()
}

#[derive(Debug, Deserialize)]
pub struct LocalSearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct LocalSearchResponse {
    pub ok: bool,
    pub results: Vec<Place>,
}

#[derive(Debug, Deserialize)]
pub struct KeywordSearchQuery {
    #[serde(default)]
    pub query: String,
    pub x: Option<String>,
    pub y: Option<String>,
    pub radius: Option<u32>,
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub sort: Option<String>,
    pub category_group_code: Option<String>,
}

impl KeywordSearchQuery {
    /// Parameters forwarded to Kakao, `query` first.
    pub fn upstream_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("query", self.query.trim().to_string())];
        let optional = [
            ("x", self.x.clone()),
            ("y", self.y.clone()),
            ("radius", self.radius.map(|v| v.to_string())),
            ("page", self.page.map(|v| v.to_string())),
            ("size", self.size.map(|v| v.to_string())),
            ("sort", self.sort.clone()),
            ("category_group_code", self.category_group_code.clone()),
        ];
        params.extend(
            optional
                .into_iter()
                .filter_map(|(key, value)| value.map(|v| (key, v))),
        );
        params
    }
}

#[derive(Debug, Deserialize)]
pub struct ReverseQuery {
    pub x: String,
    pub y: String,
}
