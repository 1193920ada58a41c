//! Validate command handler

use super::utils::{annotations_map, load_bundle};
use crate::cli::ValidateArgs;
use crate::config::Config;
use crate::deprecation::KubeRemovedApis;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use bundlegate_core::validation::{FILE_PATH_KEY, RANGE_KEY};
use bundlegate_core::{OpenShiftValidator, ValidatorOptions};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};

/// Handle the validate command
#[instrument(skip_all, fields(bundle_dir = %args.bundle_dir.display()))]
pub fn handle_validate(args: ValidateArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::with_details(
        "validate_command",
        &format!("bundle: {}", args.bundle_dir.display()),
    );

    let policy = config.policy.to_policy(
        args.unsupported_version.as_deref(),
        args.removed_in_kube.as_deref(),
    )?;
    let options = validator_options(&args, config);
    debug!(policy = ?policy, options = ?options, "Resolved validation inputs");

    let mut validator = OpenShiftValidator::new(policy);
    match KubeRemovedApis::for_release(&validator.policy().removed_in_kube) {
        Some(detector) => validator = validator.with_detector(detector),
        None => {
            let message = format!(
                "no removed-API table for Kubernetes {}, skipping removed-API detection",
                validator.policy().removed_in_kube
            );
            warn!("{}", message);
            output.warning(&message)?;
        }
    }

    output.info(&format!("Validating bundle: {}", args.bundle_dir.display()))?;
    let spinner = output.spinner("Loading bundle manifests...");
    let loaded = load_bundle(&args.bundle_dir);
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    let bundle = loaded?.with_csv_annotations(annotations_map(&args.annotations));

    let result = validator.validate_bundle(Some(&bundle), &options);
    info!(
        bundle = %result.name,
        errors = result.errors.len(),
        warnings = result.warnings.len(),
        "Validation finished"
    );

    let errors = result.errors.len();
    output.results(std::slice::from_ref(&result))?;

    if errors > 0 {
        return Err(Error::ValidationFailed { errors });
    }
    Ok(())
}

/// Label options from `--optional-values`, falling back to the config file
fn validator_options(args: &ValidateArgs, config: &Config) -> ValidatorOptions {
    if args.optional_values.is_empty() {
        return ValidatorOptions::from_optional_values(&config.label.to_optional_values());
    }

    let values: BTreeMap<String, String> = args.optional_values.iter().cloned().collect();
    for key in values.keys() {
        if key != FILE_PATH_KEY && key != RANGE_KEY {
            warn!(key = %key, "Ignoring unknown optional value");
        }
    }
    ValidatorOptions::from_optional_values(&values)
}
