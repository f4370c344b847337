use crate::command::{AccountTool, Useradd};
use crate::error::DirectoryError;
use crate::models::{AccountCreationRequest, CreationOutcome};
use std::sync::Arc;
use tracing::{info, warn};
use useradd_core::config::DirectoryConfig;

impl AccountCreationRequest {
    /// Flags for the creation utility in a fixed order, one flag per field
    /// that is set, with the username always last.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        push_value(&mut args, "-b", &self.base_dir);
        push_value(&mut args, "-c", &self.comment);
        push_value(&mut args, "-d", &self.home_dir);
        push_value(&mut args, "-e", &self.expire_date);
        if self.inactive != 0 {
            push_value(&mut args, "-f", &self.inactive.to_string());
        }
        push_value(&mut args, "-g", &self.gid);
        if !self.groups.is_empty() {
            push_value(&mut args, "-G", &self.groups.join(","));
        }
        push_value(&mut args, "-k", &self.skel_dir);
        push_switch(&mut args, "-m", self.create_home);
        push_switch(&mut args, "-M", self.no_create_home);
        push_switch(&mut args, "-N", self.no_user_group);
        push_switch(&mut args, "-o", self.non_unique);
        push_value(&mut args, "-p", &self.password);
        push_switch(&mut args, "-r", self.system);
        push_value(&mut args, "-s", &self.shell);
        if self.uid != 0 {
            push_value(&mut args, "-u", &self.uid.to_string());
        }
        push_switch(&mut args, "-U", self.user_group);
        push_value(&mut args, "-Z", &self.selinux_user);
        push_value(&mut args, "--selinux-range", &self.selinux_range);

        args.push(self.username.clone());
        args
    }
}

fn push_value(args: &mut Vec<String>, flag: &str, value: &str) {
    if !value.is_empty() {
        args.push(flag.to_string());
        args.push(value.to_string());
    }
}

fn push_switch(args: &mut Vec<String>, flag: &str, enabled: bool) {
    if enabled {
        args.push(flag.to_string());
    }
}

pub struct AccountCreator {
    tool: Arc<dyn AccountTool>,
}

impl AccountCreator {
    pub fn new(tool: Arc<dyn AccountTool>) -> Self {
        Self { tool }
    }

    pub fn from_config(config: &DirectoryConfig) -> Self {
        Self::new(Arc::new(Useradd::new(config.useradd_path.clone())))
    }

    /// A non-zero exit is reported through `success`, not as an error.
    pub async fn create_account(
        &self,
        request: &AccountCreationRequest,
    ) -> Result<CreationOutcome, DirectoryError> {
        info!(username = %request.username, "Creating account");

        let status = self.tool.create(&request.to_args()).await?;
        if !status.success {
            warn!(
                username = %request.username,
                code = ?status.code,
                "Account creation failed"
            );
        }

        Ok(CreationOutcome {
            success: status.success,
            message: status.output,
        })
    }
}
