//! Course listing query composition.
//!
//! A sparse [`CourseFilter`] plus a [`CourseSort`] and [`PageRequest`] are
//! turned into a [`ComposedQuery`] by the pure [`compose`] function. Store
//! adapters only ever execute a finished plan.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::domain::foundation::EntityId;

use super::{Course, CourseLevel, CourseModel};

pub const DEFAULT_PAGE_LIMIT: u32 = 15;
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Optional listing criteria. Absent fields impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourseFilter {
    pub category_ids: Vec<EntityId>,
    pub teacher_ids: Vec<EntityId>,
    pub ids: Vec<EntityId>,
    pub title: Option<String>,
    pub model: Option<CourseModel>,
    pub level: Option<CourseLevel>,
    pub free: Option<bool>,
    pub published: Option<bool>,
    pub deleted: Option<bool>,
}

/// An association lookup that must be resolved to course ids first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CourseAssociation {
    Categories(Vec<EntityId>),
    Teachers(Vec<EntityId>),
}

impl CourseFilter {
    /// The association to resolve before composing; categories win over teachers.
    pub fn association(&self) -> Option<CourseAssociation> {
        if !self.category_ids.is_empty() {
            Some(CourseAssociation::Categories(self.category_ids.clone()))
        } else if !self.teacher_ids.is_empty() {
            Some(CourseAssociation::Teachers(self.teacher_ids.clone()))
        } else {
            None
        }
    }

    pub fn with_category(mut self, id: EntityId) -> Self {
        self.category_ids.push(id);
        self
    }

    pub fn with_teacher(mut self, id: EntityId) -> Self {
        self.teacher_ids.push(id);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn published_only(mut self) -> Self {
        self.published = Some(true);
        self.deleted = Some(false);
        self
    }
}

/// Sort mode. Some modes also filter (`Free`, `Vip`, `VipFree`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseSort {
    #[default]
    Latest,
    Score,
    Rating,
    Popular,
    Free,
    Vip,
    VipFree,
}

impl CourseSort {
    /// Parses a sort name; anything unrecognised means `Latest`.
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "score" => CourseSort::Score,
            "rating" => CourseSort::Rating,
            "popular" => CourseSort::Popular,
            "free" => CourseSort::Free,
            "vip" => CourseSort::Vip,
            "vip_free" => CourseSort::VipFree,
            _ => CourseSort::Latest,
        }
    }

    fn predicate(&self) -> Option<CoursePredicate> {
        match self {
            CourseSort::Free => Some(CoursePredicate::MarketPriceZero),
            CourseSort::Vip => Some(CoursePredicate::VipBelowMarket),
            CourseSort::VipFree => Some(CoursePredicate::VipPriceZero),
            _ => None,
        }
    }

    fn order(&self) -> CourseOrder {
        match self {
            CourseSort::Score => CourseOrder::ScoreDesc,
            CourseSort::Rating => CourseOrder::RatingDesc,
            CourseSort::Popular => CourseOrder::UserCountDesc,
            _ => CourseOrder::IdDesc,
        }
    }
}

/// 1-based page window.
///
/// Deserialized requests go through [`PageRequest::new`], so decoded
/// bounds are normalised the same way as constructed ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawPageRequest")]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

#[derive(Deserialize)]
struct RawPageRequest {
    page: u32,
    limit: u32,
}

impl From<RawPageRequest> for PageRequest {
    fn from(raw: RawPageRequest) -> Self {
        Self::new(raw.page, raw.limit)
    }
}

impl PageRequest {
    /// Normalises page to at least 1 and limit into `1..=MAX_PAGE_LIMIT`.
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, MAX_PAGE_LIMIT),
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_LIMIT)
    }
}

/// A page of results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub has_more: bool,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        let has_more = request.offset() + (items.len() as u64) < total;
        Self {
            items,
            total,
            page: request.page,
            limit: request.limit,
            has_more,
        }
    }

    pub fn empty(request: PageRequest) -> Self {
        Self::new(Vec::new(), 0, request)
    }
}

/// A single WHERE clause of a course listing.
#[derive(Debug, Clone, PartialEq)]
pub enum CoursePredicate {
    IdIn(Vec<EntityId>),
    TitleContains(String),
    ModelIs(CourseModel),
    LevelIs(CourseLevel),
    MarketPriceZero,
    MarketPricePositive,
    VipBelowMarket,
    VipPriceZero,
    Published(bool),
    Deleted(bool),
}

impl CoursePredicate {
    /// Evaluates the predicate against an in-memory row.
    pub fn matches(&self, course: &Course) -> bool {
        match self {
            CoursePredicate::IdIn(ids) => ids.contains(&course.id),
            CoursePredicate::TitleContains(needle) => course
                .title
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            CoursePredicate::ModelIs(model) => course.model == *model,
            CoursePredicate::LevelIs(level) => course.level == *level,
            CoursePredicate::MarketPriceZero => course.market_price == 0,
            CoursePredicate::MarketPricePositive => course.market_price > 0,
            CoursePredicate::VipBelowMarket => course.vip_price < course.market_price,
            CoursePredicate::VipPriceZero => course.vip_price == 0,
            CoursePredicate::Published(flag) => course.published == *flag,
            CoursePredicate::Deleted(flag) => course.deleted == *flag,
        }
    }
}

/// ORDER BY clause of a course listing. All orders are descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseOrder {
    IdDesc,
    ScoreDesc,
    RatingDesc,
    UserCountDesc,
}

impl CourseOrder {
    pub fn column(&self) -> &'static str {
        match self {
            CourseOrder::IdDesc => "id",
            CourseOrder::ScoreDesc => "score",
            CourseOrder::RatingDesc => "rating",
            CourseOrder::UserCountDesc => "user_count",
        }
    }

    /// Compares two rows so that sorting ascending yields the listing order.
    pub fn compare(&self, a: &Course, b: &Course) -> Ordering {
        match self {
            CourseOrder::IdDesc => b.id.cmp(&a.id),
            CourseOrder::ScoreDesc => b.score.total_cmp(&a.score),
            CourseOrder::RatingDesc => b.rating.total_cmp(&a.rating),
            CourseOrder::UserCountDesc => b.user_count.cmp(&a.user_count),
        }
    }
}

/// An executable listing query.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseQueryPlan {
    pub predicates: Vec<CoursePredicate>,
    pub order: CourseOrder,
    pub page: PageRequest,
}

impl CourseQueryPlan {
    pub fn matches(&self, course: &Course) -> bool {
        self.predicates.iter().all(|p| p.matches(course))
    }
}

/// Outcome of composition: either a plan to run or a known-empty result.
#[derive(Debug, Clone, PartialEq)]
pub enum ComposedQuery {
    /// An association filter resolved to no courses.
    Empty(PageRequest),
    Plan(CourseQueryPlan),
}

/// Builds the listing query.
///
/// `resolved_ids` is the result of resolving [`CourseFilter::association`];
/// `Some(empty)` short-circuits to [`ComposedQuery::Empty`]. When present it
/// replaces `filter.ids`.
pub fn compose(
    filter: &CourseFilter,
    resolved_ids: Option<Vec<EntityId>>,
    sort: CourseSort,
    page: PageRequest,
) -> ComposedQuery {
    let mut predicates = Vec::new();

    match resolved_ids {
        Some(ids) if ids.is_empty() => return ComposedQuery::Empty(page),
        Some(ids) => predicates.push(CoursePredicate::IdIn(ids)),
        None if !filter.ids.is_empty() => predicates.push(CoursePredicate::IdIn(filter.ids.clone())),
        None => {}
    }

    if let Some(title) = filter.title.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        predicates.push(CoursePredicate::TitleContains(title.to_string()));
    }
    if let Some(model) = filter.model {
        predicates.push(CoursePredicate::ModelIs(model));
    }
    if let Some(level) = filter.level {
        predicates.push(CoursePredicate::LevelIs(level));
    }
    match filter.free {
        Some(true) => predicates.push(CoursePredicate::MarketPriceZero),
        Some(false) => predicates.push(CoursePredicate::MarketPricePositive),
        None => {}
    }
    if let Some(published) = filter.published {
        predicates.push(CoursePredicate::Published(published));
    }
    if let Some(deleted) = filter.deleted {
        predicates.push(CoursePredicate::Deleted(deleted));
    }
    if let Some(predicate) = sort.predicate() {
        predicates.push(predicate);
    }

    ComposedQuery::Plan(CourseQueryPlan {
        predicates,
        order: sort.order(),
        page,
    })
}
