//! # TestScenario: headless harness for integration tests
//!
//! A fluent builder for small, regular sites (rectangular boundary, street
//! grid, one parcel per block) that can either run the pipeline directly or
//! spawn the scenario into a Bevy `App` with `MinimalPlugins` and
//! `PlanningPlugin`.

use bevy::app::App;
use bevy::prelude::*;
use geo::{LineString, Point};

use crate::config::{PlanningConfig, PlanningSettings};
use crate::geometry::rect_polygon;
use crate::pipeline::{PipelineOptions, PipelineReport, ScenarioPipeline};
use crate::plugin::{AnalysisCompleted, AnalysisRequest, AnalysisStatus, PlanningPlugin};
use crate::scenario::{Amenity, Link, LinkClass, Parcel, Scenario, SiteBoundary, ZoningProperties};

/// Parcels are inset this far from the street centrelines.
const BLOCK_INSET: f64 = 10.0;

pub struct TestScenario {
    scenario: Scenario,
    config: PlanningConfig,
    width: f64,
    height: f64,
}

impl Default for TestScenario {
    fn default() -> Self {
        Self::new()
    }
}

impl TestScenario {
    // -----------------------------------------------------------------------
    // Builders
    // -----------------------------------------------------------------------

    /// An empty scenario with id 1 and the default config.
    pub fn new() -> Self {
        Self {
            scenario: Scenario::new(1, "test"),
            config: PlanningConfig::default(),
            width: 0.0,
            height: 0.0,
        }
    }

    /// A `blocks_x` × `blocks_y` site of square blocks with streets, one
    /// parcel per block and default zoning.
    pub fn grid(blocks_x: u32, blocks_y: u32, block_size: f64) -> Self {
        Self::new()
            .with_boundary(blocks_x as f64 * block_size, blocks_y as f64 * block_size)
            .with_street_grid(block_size)
            .with_block_parcels(block_size)
    }

    pub fn with_id(mut self, id: u32) -> Self {
        self.scenario.id = id;
        self
    }

    pub fn with_boundary(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self.scenario.boundary = Some(SiteBoundary {
            geometry: rect_polygon(0.0, 0.0, width, height),
        });
        self
    }

    /// Streets every `spacing` metres in both directions, split at every
    /// intersection. Perimeter streets are arterials with bike lanes, the
    /// rest are local streets.
    pub fn with_street_grid(mut self, spacing: f64) -> Self {
        let xs = grid_lines(self.width, spacing);
        let ys = grid_lines(self.height, spacing);
        let mut next_id = self.scenario.links.len() as u32 + 1;
        let mut push = |links: &mut Vec<Link>, a: (f64, f64), b: (f64, f64), perimeter: bool| {
            let geometry = LineString::from(vec![a, b]);
            let link = if perimeter {
                Link::new(next_id, geometry, LinkClass::Arterial).with_bike_lane()
            } else {
                Link::new(next_id, geometry, LinkClass::Local)
            };
            links.push(link);
            next_id += 1;
        };

        let links = &mut self.scenario.links;
        for (i, y) in ys.iter().enumerate() {
            let perimeter = i == 0 || i == ys.len() - 1;
            for pair in xs.windows(2) {
                push(links, (pair[0], *y), (pair[1], *y), perimeter);
            }
        }
        for (i, x) in xs.iter().enumerate() {
            let perimeter = i == 0 || i == xs.len() - 1;
            for pair in ys.windows(2) {
                push(links, (*x, pair[0]), (*x, pair[1]), perimeter);
            }
        }
        self
    }

    /// One parcel per street block, inset from the centrelines.
    pub fn with_block_parcels(mut self, block_size: f64) -> Self {
        let xs = grid_lines(self.width, block_size);
        let ys = grid_lines(self.height, block_size);
        let mut id = self.scenario.parcels.len() as u32 + 1;
        for ys_pair in ys.windows(2) {
            for xs_pair in xs.windows(2) {
                self.scenario.parcels.push(Parcel::new(
                    id,
                    rect_polygon(
                        xs_pair[0] + BLOCK_INSET,
                        ys_pair[0] + BLOCK_INSET,
                        xs_pair[1] - BLOCK_INSET,
                        ys_pair[1] - BLOCK_INSET,
                    ),
                    ZoningProperties::default(),
                ));
                id += 1;
            }
        }
        self
    }

    pub fn with_parcel(mut self, parcel: Parcel) -> Self {
        self.scenario.parcels.push(parcel);
        self
    }

    pub fn with_link(mut self, link: Link) -> Self {
        self.scenario.links.push(link);
        self
    }

    pub fn with_amenity(mut self, kind: &str, x: f64, y: f64) -> Self {
        let id = self.scenario.amenities.len() as u32 + 1;
        self.scenario.amenities.push(Amenity {
            id,
            location: Point::new(x, y),
            kind: kind.to_string(),
        });
        self
    }

    /// Apply `edit` to every parcel's zoning.
    pub fn with_zoning(mut self, edit: impl Fn(&mut ZoningProperties)) -> Self {
        for parcel in &mut self.scenario.parcels {
            edit(&mut parcel.zoning);
        }
        self
    }

    pub fn without_parcels(mut self) -> Self {
        self.scenario.parcels.clear();
        self
    }

    pub fn without_links(mut self) -> Self {
        self.scenario.links.clear();
        self
    }

    pub fn with_config(mut self, edit: impl FnOnce(&mut PlanningConfig)) -> Self {
        edit(&mut self.config);
        self
    }

    // -----------------------------------------------------------------------
    // Running
    // -----------------------------------------------------------------------

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    pub fn config(&self) -> &PlanningConfig {
        &self.config
    }

    pub fn build(self) -> (Scenario, PlanningConfig) {
        (self.scenario, self.config)
    }

    /// Run the pipeline without Bevy.
    pub fn run_pipeline(self, options: PipelineOptions) -> (Scenario, PipelineReport) {
        let (mut scenario, config) = self.build();
        let report = ScenarioPipeline::new(&config).run_all(&mut scenario, options);
        (scenario, report)
    }

    /// Spawn into a headless `App` with an `AnalysisRequest` and run one
    /// update.
    pub fn spawn(self, options: PipelineOptions) -> TestApp {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(PlanningSettings(self.config));
        app.add_plugins(PlanningPlugin);

        let entity = app
            .world_mut()
            .spawn((self.scenario, AnalysisRequest::new(options)))
            .id();
        app.update();
        TestApp { app, entity }
    }
}

fn grid_lines(extent: f64, spacing: f64) -> Vec<f64> {
    if spacing <= 0.0 || extent <= 0.0 {
        return vec![0.0];
    }
    let count = (extent / spacing).round() as u32;
    (0..=count).map(|i| i as f64 * spacing).collect()
}

/// A running headless `App` holding one scenario entity.
pub struct TestApp {
    app: App,
    entity: Entity,
}

impl TestApp {
    pub fn update(&mut self) {
        self.app.update();
    }

    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    pub fn entity(&self) -> Entity {
        self.entity
    }

    pub fn scenario(&self) -> &Scenario {
        self.app
            .world()
            .get::<Scenario>(self.entity)
            .expect("scenario entity should exist")
    }

    pub fn status(&self) -> Option<&AnalysisStatus> {
        self.app.world().get::<AnalysisStatus>(self.entity)
    }

    pub fn has_pending_request(&self) -> bool {
        self.app.world().get::<AnalysisRequest>(self.entity).is_some()
    }

    /// Queue another analysis of the same entity.
    pub fn request(&mut self, options: PipelineOptions) {
        self.app
            .world_mut()
            .entity_mut(self.entity)
            .insert(AnalysisRequest::new(options));
    }

    /// Take every `AnalysisCompleted` event sent since the previous call.
    ///
    /// Drains instead of reading the current buffer: without a fixed update
    /// in between, `MinimalPlugins` never rotates event buffers.
    pub fn completed_events(&mut self) -> Vec<AnalysisCompleted> {
        self.app
            .world_mut()
            .resource_mut::<Events<AnalysisCompleted>>()
            .drain()
            .collect()
    }
}
