//! Case files: a whole problem set-up in one YAML or JSON document.

use std::path::{Path, PathBuf};

use pt_conditions::{BoundaryConditions, InitialConditions, Value};
use pt_core::units::{kg_per_m3, s};
use pt_core::{FacetTarget, FieldKind, Real};
use pt_mesh::{Domain, FacetCategory, MeshDef};
use serde::{Deserialize, Serialize};

use crate::error::{ProblemError, ProblemResult};
use crate::problem::Problem;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CaseDef {
    pub name: String,
    /// Inline mesh descriptor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mesh: Option<MeshDef>,
    /// Mesh descriptor file, relative to the case file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mesh_file: Option<PathBuf>,
    #[serde(default)]
    pub facets: Vec<FacetLabelDef>,
    #[serde(default)]
    pub boundary_conditions: Vec<BoundaryConditionDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_conditions: Option<InitialConditionsDef>,
    #[serde(default)]
    pub physics: PhysicsDef,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    #[serde(default = "default_dt")]
    pub dt: Real,
    #[serde(default)]
    pub algorithm: AlgorithmDef,
    /// Directory the case was loaded from.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FacetLabelDef {
    pub ids: Vec<u32>,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<FacetCategory>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BoundaryConditionDef {
    pub field: FieldKind,
    pub value: ValueDef,
    pub facets: Vec<u32>,
    #[serde(default)]
    pub time_dependent: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct InitialConditionsDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub velocity: Option<ValueDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<ValueDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ValueDef {
    Scalar(Real),
    Vector(Vec<Real>),
}

impl From<&ValueDef> for Value {
    fn from(def: &ValueDef) -> Self {
        match def {
            ValueDef::Scalar(v) => Value::Scalar(*v),
            ValueDef::Vector(v) => Value::Vector(v.clone()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PhysicsDef {
    #[serde(default = "default_density")]
    pub density: Real,
    #[serde(default = "default_viscosity")]
    pub viscosity: Real,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_forces: Option<Vec<Real>>,
}

impl Default for PhysicsDef {
    fn default() -> Self {
        Self {
            density: default_density(),
            viscosity: default_viscosity(),
            body_forces: None,
        }
    }
}

/// Iteration and output settings. Unset fields take the algorithm defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AlgorithmDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dump_period: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub convergence_tolerance: Option<Real>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turbulent_viscosity: Option<Real>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

fn default_max_iterations() -> usize {
    Problem::default_parameters().max_iterations
}

fn default_dt() -> Real {
    Problem::default_parameters().dt.value
}

fn default_density() -> Real {
    Problem::default_parameters().rho.value
}

fn default_viscosity() -> Real {
    Problem::default_parameters().nu
}

/// Read a case from `.yaml`/`.yml`/`.json`.
pub fn load_case(path: &Path) -> ProblemResult<CaseDef> {
    let content = std::fs::read_to_string(path).map_err(|source| ProblemError::CaseRead {
        path: path.to_path_buf(),
        source,
    })?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let mut case: CaseDef = match ext.as_deref() {
        Some("json") => serde_json::from_str(&content)?,
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
        _ => {
            return Err(ProblemError::Case {
                what: format!("unsupported case file extension: {}", path.display()),
            });
        }
    };
    case.base_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    Ok(case)
}

impl CaseDef {
    /// Build the labelled domain described by this case.
    pub fn build_domain(&self) -> ProblemResult<Domain> {
        let mut domain = match (&self.mesh, &self.mesh_file) {
            (Some(def), None) => Domain::from_mesh(def.build()?),
            (None, Some(file)) => Domain::from_file(self.base_dir.join(file))?,
            (Some(_), Some(_)) => {
                return Err(ProblemError::Case {
                    what: "give either `mesh` or `mesh_file`, not both".to_string(),
                });
            }
            (None, None) => return Err(ProblemError::MissingDomain),
        };
        for facet in &self.facets {
            let target = FacetTarget::from_raw(&facet.ids)?;
            let categories: Vec<FacetCategory> = facet.category.into_iter().collect();
            domain.label_facet(target, facet.label.clone(), &categories)?;
        }
        Ok(domain)
    }

    /// Assemble and validate the problem described by this case.
    pub fn build_problem(&self) -> ProblemResult<Problem> {
        let domain = self.build_domain()?;

        let mut bcs = BoundaryConditions::new();
        for bc in &self.boundary_conditions {
            let target = FacetTarget::from_raw(&bc.facets)?;
            let value = Value::from(&bc.value);
            match bc.field {
                FieldKind::Velocity => bcs.add_velocity_condition(value, target, bc.time_dependent)?,
                FieldKind::Pressure => bcs.add_pressure_condition(value, target, bc.time_dependent)?,
            }
        }

        let mut ics = InitialConditions::with_domain_defaults(domain.dimension());
        if let Some(def) = &self.initial_conditions {
            if let Some(u) = &def.velocity {
                ics.set_velocity_ic(Value::from(u))?;
            }
            if let Some(p) = &def.pressure {
                ics.set_pressure_ic(Value::from(p))?;
            }
        }

        let mut params = Problem::default_parameters();
        params.rho = kg_per_m3(self.physics.density);
        params.nu = self.physics.viscosity;
        params.body_forces = self.physics.body_forces.clone();
        params.bcs = Some(bcs);
        params.ics = Some(ics);
        params.max_iterations = self.max_iterations;
        params.dt = s(self.dt);
        params.domain = Some(domain);
        Problem::new(params)
    }
}
