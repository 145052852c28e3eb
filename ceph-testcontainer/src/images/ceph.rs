use std::collections::HashMap;

use testcontainers::{core::WaitFor, Image, ImageArgs};

use crate::request::{LaunchConfig, Readiness};

#[derive(Debug, Clone, Default)]
pub struct CephDemoArgs {
    args: Vec<String>,
}

impl CephDemoArgs {
    pub fn new(args: Vec<String>) -> Self {
        Self { args }
    }
}

impl ImageArgs for CephDemoArgs {
    fn into_iterator(self) -> Box<dyn Iterator<Item = String>> {
        Box::new(self.args.into_iter())
    }
}

/// The `quay.io/ceph/demo` image as described by a resolved [`LaunchConfig`].
#[derive(Debug)]
pub struct CephDemo {
    name: String,
    tag: String,
    env_vars: HashMap<String, String>,
    ports: Vec<u16>,
    entrypoint: Option<String>,
    ready_conditions: Vec<WaitFor>,
}

impl CephDemo {
    pub fn from_config(config: &LaunchConfig) -> (Self, CephDemoArgs) {
        let request = config.request();

        let (entrypoint, args) = match request.entrypoint() {
            Some(entrypoint) => (Some(entrypoint.program.clone()), entrypoint.args.clone()),
            None => (None, vec![]),
        };

        // Log patterns are matched by the runner after the container has started,
        // only native conditions are handed over to testcontainers
        let ready_conditions = match config.readiness() {
            Readiness::LogMatches(_) => vec![],
            Readiness::Conditions(conditions) => conditions.clone(),
        };

        let image = Self {
            name: request.image_name().to_owned(),
            tag: request.image_tag().to_owned(),
            env_vars: request.env_vars().clone(),
            ports: request.exposed_ports().iter().map(|p| p.port).collect(),
            entrypoint,
            ready_conditions,
        };

        (image, CephDemoArgs::new(args))
    }
}

impl Image for CephDemo {
    type Args = CephDemoArgs;

    fn name(&self) -> String {
        self.name.clone()
    }

    fn tag(&self) -> String {
        self.tag.clone()
    }

    fn ready_conditions(&self) -> Vec<WaitFor> {
        self.ready_conditions.clone()
    }

    fn env_vars(&self) -> Box<dyn Iterator<Item = (&String, &String)> + '_> {
        Box::new(self.env_vars.iter())
    }

    fn entrypoint(&self) -> Option<String> {
        self.entrypoint.clone()
    }

    fn expose_ports(&self) -> Vec<u16> {
        self.ports.clone()
    }
}
