//! # Stability Model
//!
//! The root container for all analysis input. A model holds a prismatic and
//! a non-prismatic girder, a strand layout for every girder type and handling
//! stage, the lifting and hauling problems with their criteria, and the
//! analysis settings.
//!
//! Results are never cached: every `get_*` query solves from the current
//! input.
//!
//! ## Structure
//!
//! ```text
//! StabilityModel
//! ├── girder_type / stress_point_type
//! ├── girders: PerGirderType<Girder>
//! ├── strands: PerGirderType<PerModelType<StrandLayout>>
//! ├── lifting_problem + lifting_criteria
//! ├── hauling_problem + hauling_criteria
//! ├── modulus_factors (K1, K2)
//! └── settings: AnalysisSettings
//! ```
//!
//! ## Example
//!
//! ```rust
//! use stab_core::model::StabilityModel;
//!
//! let model = StabilityModel::default();
//! let results = model.get_lifting_results().unwrap();
//! println!("FScr = {:.2}", results.fs_cracking.fs);
//! ```

use serde::{Deserialize, Serialize};

use crate::artifact::{HaulingCheckArtifact, HaulingResults, LiftingCheckArtifact, LiftingResults};
use crate::criteria::{HaulingCriteria, LiftingCriteria};
use crate::engineer::StabilityEngineer;
use crate::errors::StabResult;
use crate::girder::{Girder, GirderType, StressPointType};
use crate::materials::ModulusFactors;
use crate::problem::{HaulingProblem, LiftingProblem, ModelType};
use crate::settings::AnalysisSettings;
use crate::strands::{map_simplified_to_exact, strand_profiles, StrandLayout, StrandMethod, StrandProfiles};
use crate::units::assign_value;

/// One value per girder type
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PerGirderType<T> {
    pub prismatic: T,
    pub non_prismatic: T,
}

impl<T> PerGirderType<T> {
    pub fn get(&self, girder_type: GirderType) -> &T {
        match girder_type {
            GirderType::Prismatic => &self.prismatic,
            GirderType::NonPrismatic => &self.non_prismatic,
        }
    }

    pub fn get_mut(&mut self, girder_type: GirderType) -> &mut T {
        match girder_type {
            GirderType::Prismatic => &mut self.prismatic,
            GirderType::NonPrismatic => &mut self.non_prismatic,
        }
    }
}

/// One value per handling stage
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PerModelType<T> {
    pub lifting: T,
    pub hauling: T,
}

impl<T> PerModelType<T> {
    pub fn get(&self, model_type: ModelType) -> &T {
        match model_type {
            ModelType::Lifting => &self.lifting,
            ModelType::Hauling => &self.hauling,
        }
    }

    pub fn get_mut(&mut self, model_type: ModelType) -> &mut T {
        match model_type {
            ModelType::Lifting => &mut self.lifting,
            ModelType::Hauling => &mut self.hauling,
        }
    }
}

/// Complete input for lifting and hauling checks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilityModel {
    girder_type: GirderType,
    stress_point_type: StressPointType,
    girders: PerGirderType<Girder>,
    strands: PerGirderType<PerModelType<StrandLayout>>,
    lifting_problem: LiftingProblem,
    hauling_problem: HaulingProblem,
    lifting_criteria: LiftingCriteria,
    hauling_criteria: HaulingCriteria,
    modulus_factors: ModulusFactors,
    settings: AnalysisSettings,
}

impl Default for StabilityModel {
    fn default() -> Self {
        let girders = PerGirderType {
            prismatic: Girder::default(),
            non_prismatic: Girder::default(),
        };
        let seeded = |girder: &Girder| {
            let mut layout = StrandLayout::default();
            layout.fpe_table = map_simplified_to_exact(&layout, girder);
            PerModelType {
                lifting: layout.clone(),
                hauling: layout,
            }
        };
        let strands = PerGirderType {
            prismatic: seeded(&girders.prismatic),
            non_prismatic: seeded(&girders.non_prismatic),
        };
        StabilityModel {
            girder_type: GirderType::Prismatic,
            stress_point_type: StressPointType::Computed,
            girders,
            strands,
            lifting_problem: LiftingProblem::default(),
            hauling_problem: HaulingProblem::default(),
            lifting_criteria: LiftingCriteria::default(),
            hauling_criteria: HaulingCriteria::default(),
            modulus_factors: ModulusFactors::default(),
            settings: AnalysisSettings::default(),
        }
    }
}

impl StabilityModel {
    pub fn new() -> Self {
        StabilityModel::default()
    }

    // ------------------------------------------------------------------------
    // Girders
    // ------------------------------------------------------------------------

    pub fn girder_type(&self) -> GirderType {
        self.girder_type
    }

    pub fn set_girder_type(&mut self, girder_type: GirderType) -> bool {
        assign_value(&mut self.girder_type, girder_type)
    }

    pub fn stress_point_type(&self) -> StressPointType {
        self.stress_point_type
    }

    pub fn set_stress_point_type(&mut self, stress_point_type: StressPointType) -> bool {
        assign_value(&mut self.stress_point_type, stress_point_type)
    }

    /// The girder of the active girder type
    pub fn girder(&self) -> &Girder {
        self.girders.get(self.girder_type)
    }

    pub fn girder_for(&self, girder_type: GirderType) -> &Girder {
        self.girders.get(girder_type)
    }

    pub fn set_girder(&mut self, girder_type: GirderType, girder: Girder) -> bool {
        assign_value(self.girders.get_mut(girder_type), girder)
    }

    // ------------------------------------------------------------------------
    // Strands
    // ------------------------------------------------------------------------

    pub fn strands(&self, girder_type: GirderType, model_type: ModelType) -> &StrandLayout {
        self.strands.get(girder_type).get(model_type)
    }

    /// Strand layout of the active girder type
    pub fn active_strands(&self, model_type: ModelType) -> &StrandLayout {
        self.strands(self.girder_type, model_type)
    }

    /// Replace a strand layout.
    ///
    /// A simplified layout re-seeds its exact table from the simplified
    /// description on the girder of the same type, so switching methods
    /// later starts from an equivalent table.
    pub fn set_strands(&mut self, girder_type: GirderType, model_type: ModelType, mut layout: StrandLayout) -> bool {
        if layout.method == StrandMethod::Simplified {
            layout.fpe_table = map_simplified_to_exact(&layout, self.girders.get(girder_type));
        }
        assign_value(self.strands.get_mut(girder_type).get_mut(model_type), layout)
    }

    /// Strand profiles on the active girder, for graphing
    pub fn strand_profiles(&self, model_type: ModelType) -> StrandProfiles {
        strand_profiles(self.active_strands(model_type), self.girder())
    }

    // ------------------------------------------------------------------------
    // Problems, criteria, settings
    // ------------------------------------------------------------------------

    pub fn lifting_problem(&self) -> &LiftingProblem {
        &self.lifting_problem
    }

    /// Mutable access for the problem's change-reporting setters
    pub fn lifting_problem_mut(&mut self) -> &mut LiftingProblem {
        &mut self.lifting_problem
    }

    pub fn set_lifting_problem(&mut self, problem: LiftingProblem) -> bool {
        assign_value(&mut self.lifting_problem, problem)
    }

    pub fn hauling_problem(&self) -> &HaulingProblem {
        &self.hauling_problem
    }

    pub fn hauling_problem_mut(&mut self) -> &mut HaulingProblem {
        &mut self.hauling_problem
    }

    pub fn set_hauling_problem(&mut self, problem: HaulingProblem) -> bool {
        assign_value(&mut self.hauling_problem, problem)
    }

    pub fn lifting_criteria(&self) -> &LiftingCriteria {
        &self.lifting_criteria
    }

    pub fn set_lifting_criteria(&mut self, criteria: LiftingCriteria) -> bool {
        assign_value(&mut self.lifting_criteria, criteria)
    }

    pub fn hauling_criteria(&self) -> &HaulingCriteria {
        &self.hauling_criteria
    }

    pub fn set_hauling_criteria(&mut self, criteria: HaulingCriteria) -> bool {
        assign_value(&mut self.hauling_criteria, criteria)
    }

    pub fn modulus_factors(&self) -> ModulusFactors {
        self.modulus_factors
    }

    pub fn set_modulus_factors(&mut self, k1: f64, k2: f64) -> bool {
        assign_value(&mut self.modulus_factors, ModulusFactors { k1, k2 })
    }

    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: AnalysisSettings) -> bool {
        assign_value(&mut self.settings, settings)
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    fn engineer(&self) -> StabilityEngineer<'_> {
        StabilityEngineer::new(self.girder(), self.stress_point_type, self.modulus_factors, &self.settings)
    }

    /// Solve the lifting check for the current input
    pub fn get_lifting_check_artifact(&self) -> StabResult<LiftingCheckArtifact> {
        self.engineer().lifting(
            self.active_strands(ModelType::Lifting),
            &self.lifting_problem,
            &self.lifting_criteria,
        )
    }

    pub fn get_lifting_results(&self) -> StabResult<LiftingResults> {
        Ok(self.get_lifting_check_artifact()?.results())
    }

    /// Solve the hauling check for the current input
    pub fn get_hauling_check_artifact(&self) -> StabResult<HaulingCheckArtifact> {
        self.engineer().hauling(
            self.active_strands(ModelType::Hauling),
            &self.hauling_problem,
            &self.hauling_criteria,
        )
    }

    pub fn get_hauling_results(&self) -> StabResult<HaulingResults> {
        Ok(self.get_hauling_check_artifact()?.results())
    }

    // ------------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------------

    /// Serialize to the versioned document format
    pub fn to_json(&self) -> StabResult<String> {
        crate::document::to_json(self)
    }

    /// Parse a document into a new model
    pub fn from_json(json: &str) -> StabResult<Self> {
        crate::document::from_json(json)
    }

    /// Replace this model with the contents of a document.
    ///
    /// The model is unchanged when the document cannot be read.
    pub fn load_from_json(&mut self, json: &str) -> StabResult<()> {
        let loaded = StabilityModel::from_json(json)?;
        *self = loaded;
        Ok(())
    }

    /// Install both girders at once; used when building a model from a document
    pub(crate) fn set_girders(&mut self, girders: PerGirderType<Girder>) {
        self.girders = girders;
    }

    pub(crate) fn set_all_strands(&mut self, strands: PerGirderType<PerModelType<StrandLayout>>) {
        self.strands = strands;
    }
}
