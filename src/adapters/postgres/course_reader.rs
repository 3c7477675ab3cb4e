//! PostgreSQL implementation of CourseReader.
//!
//! Listing plans are rendered with `QueryBuilder`; every user-supplied value
//! is bound, only column names from closed enums are pushed as text.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::domain::catalog::{
    Chapter, Course, CourseAssociation, CourseOrder, CoursePredicate, CourseQueryPlan,
    LessonAttrs, Page,
};
use crate::domain::foundation::{DomainError, EntityId, ErrorCode, Timestamp};

use crate::ports::CourseReader;

const COURSE_COLUMNS: &str = "id, title, model, level, market_price, vip_price, score, rating, \
     user_count, lesson_count, published, deleted";

const CHAPTER_COLUMNS: &str = "id, course_id, parent_id, title, priority, free, attrs, \
     like_count, published, deleted, created_at";

/// PostgreSQL implementation of the CourseReader port.
#[derive(Clone)]
pub struct PostgresCourseReader {
    pool: PgPool,
}

impl PostgresCourseReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl std::fmt::Debug for PostgresCourseReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresCourseReader")
            .field("pool", &"PgPool")
            .finish()
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CourseRow {
    id: i64,
    title: String,
    model: String,
    level: String,
    market_price: i64,
    vip_price: i64,
    score: f64,
    rating: f64,
    user_count: i64,
    lesson_count: i64,
    published: bool,
    deleted: bool,
}

impl TryFrom<CourseRow> for Course {
    type Error = DomainError;

    fn try_from(row: CourseRow) -> Result<Self, Self::Error> {
        Ok(Course {
            id: EntityId::new(row.id)?,
            title: row.title,
            model: row.model.parse()?,
            level: row.level.parse()?,
            market_price: row.market_price,
            vip_price: row.vip_price,
            score: row.score,
            rating: row.rating,
            user_count: row.user_count,
            lesson_count: row.lesson_count,
            published: row.published,
            deleted: row.deleted,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ChapterRow {
    id: i64,
    course_id: i64,
    parent_id: Option<i64>,
    title: String,
    priority: i32,
    free: bool,
    attrs: Option<serde_json::Value>,
    like_count: i64,
    published: bool,
    deleted: bool,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<ChapterRow> for Chapter {
    type Error = DomainError;

    fn try_from(row: ChapterRow) -> Result<Self, Self::Error> {
        let attrs = row
            .attrs
            .map(serde_json::from_value::<LessonAttrs>)
            .transpose()
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Invalid lesson attrs on chapter {}: {}", row.id, e),
                )
            })?;

        Ok(Chapter {
            id: EntityId::new(row.id)?,
            course_id: EntityId::new(row.course_id)?,
            // Legacy rows use 0 for "no parent".
            parent_id: row.parent_id.filter(|p| *p > 0).map(EntityId::new).transpose()?,
            title: row.title,
            priority: row.priority,
            free: row.free,
            attrs,
            like_count: row.like_count,
            published: row.published,
            deleted: row.deleted,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

fn db_error(context: &str) -> impl Fn(sqlx::Error) -> DomainError + '_ {
    move |e| DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, e))
}

fn raw_ids(ids: &[EntityId]) -> Vec<i64> {
    ids.iter().map(EntityId::value).collect()
}

/// Escapes LIKE metacharacters so the title filter is a literal substring.
fn escape_like(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Appends one ` AND <predicate>` clause.
fn push_predicate(qb: &mut QueryBuilder<'_, Postgres>, predicate: &CoursePredicate) {
    match predicate {
        CoursePredicate::IdIn(ids) => {
            qb.push(" AND id = ANY(");
            qb.push_bind(raw_ids(ids));
            qb.push(")");
        }
        CoursePredicate::TitleContains(title) => {
            qb.push(" AND title ILIKE ");
            qb.push_bind(format!("%{}%", escape_like(title)));
        }
        CoursePredicate::ModelIs(model) => {
            qb.push(" AND model = ");
            qb.push_bind(model.as_str());
        }
        CoursePredicate::LevelIs(level) => {
            qb.push(" AND level = ");
            qb.push_bind(level.as_str());
        }
        CoursePredicate::MarketPriceZero => {
            qb.push(" AND market_price = 0");
        }
        CoursePredicate::MarketPricePositive => {
            qb.push(" AND market_price > 0");
        }
        CoursePredicate::VipBelowMarket => {
            qb.push(" AND vip_price < market_price");
        }
        CoursePredicate::VipPriceZero => {
            qb.push(" AND vip_price = 0");
        }
        CoursePredicate::Published(flag) => {
            qb.push(" AND published = ");
            qb.push_bind(*flag);
        }
        CoursePredicate::Deleted(flag) => {
            qb.push(" AND deleted = ");
            qb.push_bind(*flag);
        }
    }
}

fn build_where(qb: &mut QueryBuilder<'_, Postgres>, plan: &CourseQueryPlan) {
    qb.push(" WHERE 1=1");
    for predicate in &plan.predicates {
        push_predicate(qb, predicate);
    }
}

fn build_select(plan: &CourseQueryPlan) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {} FROM courses", COURSE_COLUMNS));
    build_where(&mut qb, plan);
    qb.push(" ORDER BY ");
    qb.push(plan.order.column());
    qb.push(" DESC");
    if plan.order != CourseOrder::IdDesc {
        // Tie-break so pages are stable.
        qb.push(", id DESC");
    }
    qb.push(" LIMIT ");
    qb.push_bind(plan.page.limit as i64);
    qb.push(" OFFSET ");
    qb.push_bind(plan.page.offset() as i64);
    qb
}

fn build_count(plan: &CourseQueryPlan) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM courses");
    build_where(&mut qb, plan);
    qb
}

impl PostgresCourseReader {
    async fn count_where(&self, sql: &str, course_id: EntityId) -> Result<u64, DomainError> {
        let count: i64 = sqlx::query_scalar(sql)
            .bind(course_id.value())
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count rows"))?;
        Ok(count.max(0) as u64)
    }

    async fn chapters_where(
        &self,
        course_id: EntityId,
        lessons_only: bool,
    ) -> Result<Vec<Chapter>, DomainError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM chapters WHERE course_id = ",
            CHAPTER_COLUMNS
        ));
        qb.push_bind(course_id.value());
        qb.push(" AND deleted = FALSE");
        if lessons_only {
            qb.push(" AND parent_id > 0");
        }
        qb.push(" ORDER BY priority ASC, id ASC");

        let rows: Vec<ChapterRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to fetch chapters"))?;

        rows.into_iter().map(Chapter::try_from).collect()
    }
}

#[async_trait]
impl CourseReader for PostgresCourseReader {
    async fn fetch_page(&self, plan: &CourseQueryPlan) -> Result<Page<Course>, DomainError> {
        let rows: Vec<CourseRow> = build_select(plan)
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list courses"))?;

        let total: i64 = build_count(plan)
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count courses"))?;

        let items = rows
            .into_iter()
            .map(Course::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(items, total.max(0) as u64, plan.page))
    }

    async fn course_ids_for(
        &self,
        association: &CourseAssociation,
    ) -> Result<Vec<EntityId>, DomainError> {
        let (sql, keys) = match association {
            CourseAssociation::Categories(ids) => (
                "SELECT DISTINCT course_id FROM course_categories \
                 WHERE category_id = ANY($1) ORDER BY course_id",
                raw_ids(ids),
            ),
            CourseAssociation::Teachers(ids) => (
                "SELECT DISTINCT course_id FROM course_teachers \
                 WHERE teacher_id = ANY($1) ORDER BY course_id",
                raw_ids(ids),
            ),
        };

        let ids: Vec<i64> = sqlx::query_scalar(sql)
            .bind(keys)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to resolve course association"))?;

        ids.into_iter()
            .map(|id| EntityId::new(id).map_err(DomainError::from))
            .collect()
    }

    async fn find_by_id(&self, id: EntityId) -> Result<Option<Course>, DomainError> {
        let sql = format!("SELECT {} FROM courses WHERE id = $1", COURSE_COLUMNS);
        let row: Option<CourseRow> = sqlx::query_as(&sql)
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to fetch course"))?;

        row.map(Course::try_from).transpose()
    }

    async fn find_by_ids(&self, ids: &[EntityId]) -> Result<Vec<Course>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {} FROM courses WHERE id = ANY($1) ORDER BY id",
            COURSE_COLUMNS
        );
        let rows: Vec<CourseRow> = sqlx::query_as(&sql)
            .bind(raw_ids(ids))
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to fetch courses"))?;

        rows.into_iter().map(Course::try_from).collect()
    }

    async fn find_chapters(&self, course_id: EntityId) -> Result<Vec<Chapter>, DomainError> {
        self.chapters_where(course_id, false).await
    }

    async fn find_lessons(&self, course_id: EntityId) -> Result<Vec<Chapter>, DomainError> {
        self.chapters_where(course_id, true).await
    }

    async fn count_lessons(&self, course_id: EntityId) -> Result<u64, DomainError> {
        self.count_where(
            "SELECT COUNT(*) FROM chapters \
             WHERE course_id = $1 AND parent_id > 0 AND deleted = FALSE",
            course_id,
        )
        .await
    }

    async fn count_consults(&self, course_id: EntityId) -> Result<u64, DomainError> {
        self.count_where(
            "SELECT COUNT(*) FROM consults WHERE course_id = $1 AND published = TRUE",
            course_id,
        )
        .await
    }

    async fn count_reviews(&self, course_id: EntityId) -> Result<u64, DomainError> {
        self.count_where(
            "SELECT COUNT(*) FROM reviews WHERE course_id = $1 AND published = TRUE",
            course_id,
        )
        .await
    }

    async fn average_rating(&self, course_id: EntityId) -> Result<Option<f64>, DomainError> {
        sqlx::query_scalar(
            "SELECT AVG(rating)::DOUBLE PRECISION FROM reviews \
             WHERE course_id = $1 AND published = TRUE",
        )
        .bind(course_id.value())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to average ratings"))
    }
}
