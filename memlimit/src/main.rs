// SPDX-License-Identifier: MIT OR Apache-2.0
use self::args::{ArgsError, CliArgs};
use clap::{CommandFactory, Parser};
use std::process::ExitCode;
use valimit::{
    FailureKind, LimitStore, Outcome, PrivilegeGate, Report, Request, SystemChannel, SystemGate,
    SystemStore, VaLimitChannel, execute,
};

mod args;
mod log;
mod profile;

fn main() -> ExitCode {
    // Parse arguments.
    let req = match CliArgs::parse().into_request() {
        Ok(v) => v,
        Err(ArgsError::NoAction) => {
            if let Err(e) = CliArgs::command().print_help() {
                error!(e, "Failed to print usage");
            }

            return ExitCode::FAILURE;
        }
        Err(e) => {
            error!(e, "Invalid arguments");
            return ExitCode::FAILURE;
        }
    };

    run(&req, &SystemGate, &SystemChannel::new(), &SystemStore)
}

fn run(
    req: &Request,
    gate: &dyn PrivilegeGate,
    channel: &dyn VaLimitChannel,
    store: &dyn LimitStore,
) -> ExitCode {
    let out = match execute(req, gate, channel, store) {
        Ok(v) => v,
        Err(e) => {
            error!(e, "Failed to run");

            match e.kind() {
                FailureKind::UnsupportedPlatform => {
                    error!("This tool only supports Windows Vista SP1/Server 2008 and higher.")
                }
                FailureKind::PermissionDenied => error!(
                    "Make sure that you are running with administrative privileges and that your account has the increase quota privilege."
                ),
                FailureKind::Other => {}
            }

            return ExitCode::FAILURE;
        }
    };

    print_outcome(&out);

    ExitCode::SUCCESS
}

fn print_outcome(out: &Outcome) {
    if out.applied {
        info!("Limits set successfully.");
    }

    if out.persisted {
        info!("Limits written to the registry. They will also be used after a reboot.");
    }

    for a in &out.adjustments {
        warn!(
            "Limit for {} was adjusted by the kernel from {} KB to {} KB.",
            a.resource,
            a.requested / 1024,
            a.actual / 1024
        );
    }

    println!();
    print!("{}", Report::new(&out.record));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use valimit::{
        ChannelError, LimitEdits, PersistError, Privilege, PrivilegeError, PrivilegeToken,
        VaLimitRecord, VaResource, check_apply_token,
    };

    struct Gate(bool);

    impl PrivilegeGate for Gate {
        fn acquire(&self, privilege: Privilege) -> Result<PrivilegeToken, PrivilegeError> {
            if self.0 {
                Ok(unsafe { PrivilegeToken::new_unchecked(privilege) })
            } else {
                Err(PrivilegeError::NotHeld(privilege))
            }
        }
    }

    struct Kernel {
        record: RefCell<VaLimitRecord>,
        supported: bool,
        applies: Cell<usize>,
    }

    impl Kernel {
        fn new(supported: bool) -> Self {
            Self {
                record: RefCell::default(),
                supported,
                applies: Cell::new(0),
            }
        }
    }

    impl VaLimitChannel for Kernel {
        fn query(&self) -> Result<VaLimitRecord, ChannelError> {
            if self.supported {
                Ok(self.record.borrow().clone())
            } else {
                Err(ChannelError::UnsupportedPlatform)
            }
        }

        fn apply(&self, token: &PrivilegeToken, record: &VaLimitRecord) -> Result<(), ChannelError> {
            self.applies.set(self.applies.get() + 1);

            check_apply_token(token)?;

            if !self.supported {
                return Err(ChannelError::UnsupportedPlatform);
            }

            *self.record.borrow_mut() = record.clone();

            Ok(())
        }
    }

    struct Store;

    impl LimitStore for Store {
        fn persist(&self, _: &LimitEdits) -> Result<(), PersistError> {
            Ok(())
        }
    }

    fn set_paged_pool(mb: u32) -> Request {
        let mut edits = LimitEdits::new();

        edits.set(VaResource::PagedPool, mb);

        Request::Set {
            edits,
            persist: false,
        }
    }

    #[test]
    fn usage_is_valid() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn query_succeeds() {
        let kernel = Kernel::new(true);

        assert_eq!(
            run(&Request::Query, &Gate(false), &kernel, &Store),
            ExitCode::SUCCESS
        );
        assert_eq!(kernel.applies.get(), 0);
    }

    #[test]
    fn set_succeeds() {
        let kernel = Kernel::new(true);

        assert_eq!(
            run(&set_paged_pool(64), &Gate(true), &kernel, &Store),
            ExitCode::SUCCESS
        );
        assert_eq!(kernel.applies.get(), 1);
        assert_eq!(kernel.record.borrow()[VaResource::PagedPool].limit, 64 * 1024 * 1024);
    }

    #[test]
    fn denied_set_fails() {
        let kernel = Kernel::new(true);

        assert_eq!(
            run(&set_paged_pool(64), &Gate(false), &kernel, &Store),
            ExitCode::FAILURE
        );
        assert_eq!(kernel.applies.get(), 0);
        assert_eq!(kernel.record.borrow()[VaResource::PagedPool].limit, 0);
    }

    #[test]
    fn unsupported_query_fails() {
        let kernel = Kernel::new(false);

        assert_eq!(
            run(&Request::Query, &Gate(true), &kernel, &Store),
            ExitCode::FAILURE
        );
    }
}
