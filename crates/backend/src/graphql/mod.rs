use std::sync::Arc;

use async_graphql::{Context, Enum, InputObject, Object, SimpleObject, ID};
use civicmap_shared::{
    calc, context,
    filter::ReportFilter,
    models::{Category, Coordinate, Priority, Region, ReportPin, Selection, Status, Tier},
    selector, viewport,
};

use crate::assets::Assets;
use crate::storage::{ReportRecord, Storage};

// GraphQL mirrors of the engine enums

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum GqlCategory {
    Road,
    Lighting,
    Cleaning,
    Others,
}

impl From<Category> for GqlCategory {
    fn from(c: Category) -> Self {
        match c {
            Category::Road => GqlCategory::Road,
            Category::Lighting => GqlCategory::Lighting,
            Category::Cleaning => GqlCategory::Cleaning,
            Category::Others => GqlCategory::Others,
        }
    }
}

impl From<GqlCategory> for Category {
    fn from(c: GqlCategory) -> Self {
        match c {
            GqlCategory::Road => Category::Road,
            GqlCategory::Lighting => Category::Lighting,
            GqlCategory::Cleaning => Category::Cleaning,
            GqlCategory::Others => Category::Others,
        }
    }
}

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum GqlStatus {
    Pending,
    InProgress,
    Resolved,
}

impl From<Status> for GqlStatus {
    fn from(s: Status) -> Self {
        match s {
            Status::Pending => GqlStatus::Pending,
            Status::InProgress => GqlStatus::InProgress,
            Status::Resolved => GqlStatus::Resolved,
        }
    }
}

impl From<GqlStatus> for Status {
    fn from(s: GqlStatus) -> Self {
        match s {
            GqlStatus::Pending => Status::Pending,
            GqlStatus::InProgress => Status::InProgress,
            GqlStatus::Resolved => Status::Resolved,
        }
    }
}

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum GqlPriority {
    Low,
    Medium,
    High,
}

impl From<Priority> for GqlPriority {
    fn from(p: Priority) -> Self {
        match p {
            Priority::Low => GqlPriority::Low,
            Priority::Medium => GqlPriority::Medium,
            Priority::High => GqlPriority::High,
        }
    }
}

impl From<GqlPriority> for Priority {
    fn from(p: GqlPriority) -> Self {
        match p {
            GqlPriority::Low => Priority::Low,
            GqlPriority::Medium => Priority::Medium,
            GqlPriority::High => Priority::High,
        }
    }
}

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum GqlTier {
    #[graphql(name = "NEARBY_5KM")]
    Nearby5km,
    #[graphql(name = "NEARBY_10KM")]
    Nearby10km,
    #[graphql(name = "METRO_50KM")]
    Metro50km,
    CityWide,
}

impl From<Tier> for GqlTier {
    fn from(t: Tier) -> Self {
        match t {
            Tier::Nearby5km => GqlTier::Nearby5km,
            Tier::Nearby10km => GqlTier::Nearby10km,
            Tier::Metro50km => GqlTier::Metro50km,
            Tier::CityWide => GqlTier::CityWide,
        }
    }
}

// GraphQL output types

#[derive(SimpleObject, Clone)]
pub struct GqlCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<Coordinate> for GqlCoordinate {
    fn from(c: Coordinate) -> Self {
        GqlCoordinate {
            latitude: c.latitude,
            longitude: c.longitude,
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct GqlRegion {
    pub center: GqlCoordinate,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl From<Region> for GqlRegion {
    fn from(r: Region) -> Self {
        GqlRegion {
            center: r.center.into(),
            latitude_delta: r.latitude_delta,
            longitude_delta: r.longitude_delta,
        }
    }
}

#[derive(SimpleObject)]
pub struct GqlCity {
    pub name: String,
    pub region: GqlRegion,
}

#[derive(SimpleObject)]
pub struct GqlPin {
    pub id: ID,
    pub coordinate: GqlCoordinate,
    pub category: GqlCategory,
    pub status: GqlStatus,
    pub priority: GqlPriority,
}

impl From<ReportPin> for GqlPin {
    fn from(p: ReportPin) -> Self {
        GqlPin {
            id: ID(p.id),
            coordinate: p.coordinate.into(),
            category: p.category.into(),
            status: p.status.into(),
            priority: p.priority.into(),
        }
    }
}

#[derive(SimpleObject)]
pub struct GqlReport {
    pub id: ID,
    pub coordinate: GqlCoordinate,
    pub category: GqlCategory,
    pub status: GqlStatus,
    pub priority: GqlPriority,
    pub reported_at: String,
    pub updated_at: String,
}

impl From<ReportRecord> for GqlReport {
    fn from(r: ReportRecord) -> Self {
        GqlReport {
            id: ID(r.pin.id),
            coordinate: r.pin.coordinate.into(),
            category: r.pin.category.into(),
            status: r.pin.status.into(),
            priority: r.pin.priority.into(),
            reported_at: r.reported_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(SimpleObject)]
pub struct GqlMapView {
    pub region: GqlRegion,
    pub tier: GqlTier,
    pub context_count: u64,
    pub context_label: String,
}

#[derive(SimpleObject)]
pub struct GqlVisibility {
    pub pins: Vec<GqlPin>,
    pub count: u64,
    pub total: u64,
    pub label: String,
}

#[derive(SimpleObject)]
pub struct GqlRecenter {
    pub region: GqlRegion,
    pub visible_count: u64,
    pub label: String,
}

#[derive(SimpleObject)]
pub struct GqlStats {
    pub total_reports: u64,
    pub pending: u64,
    pub in_progress: u64,
    pub resolved: u64,
    pub db_size_bytes: u64,
}

// Input types

#[derive(InputObject)]
pub struct CoordinateInput {
    pub latitude: f64,
    pub longitude: f64,
}

impl CoordinateInput {
    fn to_coordinate(&self) -> async_graphql::Result<Coordinate> {
        Ok(Coordinate::new(self.latitude, self.longitude)?)
    }
}

#[derive(InputObject)]
pub struct RegionInput {
    pub center: CoordinateInput,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl RegionInput {
    fn to_region(&self) -> async_graphql::Result<Region> {
        Ok(Region::new(
            self.center.to_coordinate()?,
            self.latitude_delta,
            self.longitude_delta,
        )?)
    }
}

#[derive(InputObject)]
pub struct SubmitReportInput {
    pub coordinate: CoordinateInput,
    pub category: GqlCategory,
    pub priority: Option<GqlPriority>,
}

fn parse_filter(filter: Option<String>) -> async_graphql::Result<ReportFilter> {
    match filter {
        Some(f) => Ok(f.parse::<ReportFilter>()?),
        None => Ok(ReportFilter::All),
    }
}

/// Map header for a selection, preferring the filter label when one is active.
fn map_view(
    selection: Selection,
    filter: &ReportFilter,
    filtered_total: usize,
    city: &str,
) -> GqlMapView {
    let context_label = context::filtered_label(filter, filtered_total)
        .unwrap_or_else(|| context::selection_label(&selection, city));
    GqlMapView {
        region: selection.region.into(),
        tier: selection.tier.into(),
        context_count: selection.context_count as u64,
        context_label,
    }
}

// Query root

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn city(&self, ctx: &Context<'_>) -> async_graphql::Result<GqlCity> {
        let assets = ctx.data::<Arc<Assets>>()?;
        Ok(GqlCity {
            name: assets.city.name.clone(),
            region: assets.city.region.into(),
        })
    }

    async fn reports(
        &self,
        ctx: &Context<'_>,
        filter: Option<String>,
    ) -> async_graphql::Result<Vec<GqlReport>> {
        let storage = ctx.data::<Arc<Storage>>()?;
        let filter = parse_filter(filter)?;
        let records = storage.list_reports().map_err(async_graphql::Error::new)?;
        Ok(records
            .into_iter()
            .filter(|r| filter.matches(&r.pin))
            .map(GqlReport::from)
            .collect())
    }

    /// Initial camera for the map. Without a user location the city-wide region is used.
    async fn initial_region(
        &self,
        ctx: &Context<'_>,
        user_location: Option<CoordinateInput>,
        filter: Option<String>,
    ) -> async_graphql::Result<GqlMapView> {
        let assets = ctx.data::<Arc<Assets>>()?;
        let storage = ctx.data::<Arc<Storage>>()?;
        let filter = parse_filter(filter)?;
        let pins = storage.list_pins().map_err(async_graphql::Error::new)?;
        let filtered_total = filter.apply(&pins).len();
        let city = &assets.city;

        let selection = match user_location {
            Some(loc) => {
                let user = loc.to_coordinate()?;
                selector::select(user, &pins, &city.region, &city.selector)?
            }
            None => Selection {
                region: city.region,
                tier: Tier::CityWide,
                context_count: filtered_total,
            },
        };

        tracing::debug!(tier = %selection.tier, count = selection.context_count, "Initial region");
        Ok(map_view(selection, &filter, filtered_total, &city.name))
    }

    async fn visible_pins(
        &self,
        ctx: &Context<'_>,
        region: RegionInput,
        filter: Option<String>,
    ) -> async_graphql::Result<GqlVisibility> {
        let storage = ctx.data::<Arc<Storage>>()?;
        let region = region.to_region()?;
        let filter = parse_filter(filter)?;
        let pins = filter.apply(&storage.list_pins().map_err(async_graphql::Error::new)?);

        let result = viewport::visible_pins(&region, &pins);
        Ok(GqlVisibility {
            label: context::visibility_label(result.count, pins.len()),
            count: result.count as u64,
            total: pins.len() as u64,
            pins: result.visible_pins.into_iter().map(GqlPin::from).collect(),
        })
    }

    /// Tight region on the user's own location.
    async fn recenter(
        &self,
        ctx: &Context<'_>,
        user_location: CoordinateInput,
        filter: Option<String>,
    ) -> async_graphql::Result<GqlRecenter> {
        let assets = ctx.data::<Arc<Assets>>()?;
        let storage = ctx.data::<Arc<Storage>>()?;
        let filter = parse_filter(filter)?;
        let region = assets
            .city
            .selector
            .recenter_region(user_location.to_coordinate()?)?;
        let pins = filter.apply(&storage.list_pins().map_err(async_graphql::Error::new)?);

        let visible = viewport::visible_pins(&region, &pins).count;
        Ok(GqlRecenter {
            region: region.into(),
            visible_count: visible as u64,
            label: context::recenter_label(visible),
        })
    }

    /// Great-circle distance in kilometres.
    async fn distance(
        &self,
        a: CoordinateInput,
        b: CoordinateInput,
    ) -> async_graphql::Result<f64> {
        Ok(calc::distance_km(a.to_coordinate()?, b.to_coordinate()?))
    }

    async fn stats(&self, ctx: &Context<'_>) -> async_graphql::Result<GqlStats> {
        let storage = ctx.data::<Arc<Storage>>()?;
        let pins = storage.list_pins().map_err(async_graphql::Error::new)?;
        let db_size_bytes = storage.db_size_bytes().map_err(async_graphql::Error::new)?;

        let count = |status: Status| pins.iter().filter(|p| p.status == status).count() as u64;
        Ok(GqlStats {
            total_reports: pins.len() as u64,
            pending: count(Status::Pending),
            in_progress: count(Status::InProgress),
            resolved: count(Status::Resolved),
            db_size_bytes,
        })
    }
}

// Mutation root

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn submit_report(
        &self,
        ctx: &Context<'_>,
        input: SubmitReportInput,
    ) -> async_graphql::Result<GqlReport> {
        let storage = ctx.data::<Arc<Storage>>()?;
        let pin = ReportPin {
            id: ReportPin::new_id(),
            coordinate: input.coordinate.to_coordinate()?,
            category: input.category.into(),
            status: Status::Pending,
            priority: input.priority.map(Priority::from).unwrap_or(Priority::Medium),
        };
        let record = ReportRecord::new(pin);

        storage
            .save_report(&record)
            .map_err(async_graphql::Error::new)?;
        tracing::info!(id = %record.pin.id, category = %record.pin.category, "Report submitted");

        Ok(GqlReport::from(record))
    }

    async fn update_report_status(
        &self,
        ctx: &Context<'_>,
        id: ID,
        status: GqlStatus,
    ) -> async_graphql::Result<GqlReport> {
        let storage = ctx.data::<Arc<Storage>>()?;
        let record = storage
            .update_status(&id, status.into())
            .map_err(async_graphql::Error::new)?
            .ok_or_else(|| async_graphql::Error::new("Report not found"))?;
        Ok(GqlReport::from(record))
    }

    async fn delete_report(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<bool> {
        let storage = ctx.data::<Arc<Storage>>()?;
        storage.delete_report(&id).map_err(async_graphql::Error::new)
    }
}

pub type Schema = async_graphql::Schema<QueryRoot, MutationRoot, async_graphql::EmptySubscription>;

pub fn build_schema(assets: Arc<Assets>, storage: Arc<Storage>) -> Schema {
    async_graphql::Schema::build(QueryRoot, MutationRoot, async_graphql::EmptySubscription)
        .data(assets)
        .data(storage)
        .finish()
}
