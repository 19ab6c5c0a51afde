use crate::params::{normalize_params, DeployParams, ValidationError};
use crate::template::{Outputs, Parameters, Resources, Template, TEMPLATE_FORMAT_VERSION};
use crate::{cluster, compute, dns, network, storage};

/// Assembles the full resource graph for one deploy. Evaluated once; the
/// output is handed to the provisioning engine unchanged.
pub fn synthesize(params: &DeployParams) -> Result<Template, ValidationError> {
    let params = normalize_params(params.clone())?;

    let mut template = Template {
        format_version: TEMPLATE_FORMAT_VERSION.to_string(),
        description: format!("Spot-hosted game server stack for {}", params.server_name),
        parameters: Parameters::new(),
        resources: Resources::new(),
        outputs: Outputs::new(),
    };

    network::declare(&params, &mut template);
    storage::declare(&params, &mut template);
    compute::declare(&params, &mut template);
    cluster::declare(&params, &mut template);
    dns::declare(&params, &mut template);

    Ok(template)
}
